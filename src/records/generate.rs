//! Seeded synthetic comparison data.

use super::record::{Choice, ComparisonRecord};

pub const REPOSITORIES: &[&str] = &[
    "ethereum/go-ethereum",
    "ethereum/solidity",
    "ethereum/consensus-specs",
    "ethereum/execution-apis",
    "ethereum/py-evm",
    "ethereum/web3.py",
    "foundry-rs/foundry",
    "hyperledger/besu",
    "nethermindeth/nethermind",
    "paradigmxyz/reth",
    "sigp/lighthouse",
    "prysmaticlabs/prysm",
    "consensys/teku",
    "status-im/nimbus-eth2",
    "chainsafe/lodestar",
    "erigontech/erigon",
    "openzeppelin/openzeppelin-contracts",
    "vyperlang/vyper",
    "wevm/viem",
    "ethers-io/ethers.js",
    "nomicfoundation/hardhat",
    "alloy-rs/alloy",
];

const REASONINGS: &[&str] = &[
    "Core dependency for most clients in the ecosystem",
    "Wider adoption across downstream tooling",
    "Critical to consensus layer security",
    "Smaller surface area, easier to replace",
    "Maintained by a single team, higher bus factor risk",
    "Used in production by major infrastructure providers",
    "Foundational library, many transitive dependents",
    "Developer tooling, important but not on the critical path",
];

/// Share of records generated without reasoning.
const MISSING_REASONING_RATE: f64 = 0.25;
const JUROR_COUNT: u64 = 12;

/// xorshift64* generator; deterministic for a given seed.
#[derive(Clone, Debug)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    pub fn gen_range_usize(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() % (upper as u64)) as usize
    }

    pub fn gen_range_f64(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }
}

/// Draws `count` comparisons uniformly over [`REPOSITORIES`]. The parent is
/// drawn independently and may equal either side.
pub fn generate(count: usize, seed: u64, extended_multiplier: bool) -> Vec<ComparisonRecord> {
    let mut rng = XorShift64::new(seed);
    let max_multiplier = if extended_multiplier { 50.0 } else { 5.0 };
    let pool = REPOSITORIES.len();

    (0..count)
        .map(|index| {
            let first = rng.gen_range_usize(pool);
            let mut second = rng.gen_range_usize(pool - 1);
            if second >= first {
                second += 1;
            }
            let parent = REPOSITORIES[rng.gen_range_usize(pool)];
            let choice = if rng.next_u64() & 1 == 0 {
                Choice::A
            } else {
                Choice::B
            };
            let multiplier = (rng.gen_range_f64(1.0, max_multiplier) * 100.0).round() / 100.0;
            let reasoning = (rng.next_f64() >= MISSING_REASONING_RATE)
                .then(|| REASONINGS[rng.gen_range_usize(REASONINGS.len())].to_owned());
            let juror = format!("juror-{}", rng.next_u64() % JUROR_COUNT + 1);

            ComparisonRecord {
                id: index as u64,
                repo_a: REPOSITORIES[first].to_owned(),
                repo_b: REPOSITORIES[second].to_owned(),
                parent: parent.to_owned(),
                choice,
                multiplier: Some(multiplier),
                reasoning,
                timestamp: None,
                juror: Some(juror),
            }
        })
        .collect()
}
