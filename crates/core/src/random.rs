//! Random Source - 可复现随机源
//!
//! 所有随机行为都通过 RandomSource 抽取，相同种子 + 相同调用顺序 = 相同结果。
//! 每次模拟运行持有独立实例；并发运行之间不共享。

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// 默认种子
pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;

/// 带种子的随机源
#[derive(Debug, Clone)]
pub struct RandomSource {
    /// 当前种子
    seed: u64,

    /// 底层生成器
    rng: ChaCha8Rng,
}

impl RandomSource {
    /// 创建新的随机源
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// 为批量运行中的第 `run` 次运行派生独立随机源
    pub fn for_run(base_seed: u64, run: u64) -> Self {
        Self::new(splitmix64(base_seed ^ splitmix64(run)))
    }

    /// 当前种子
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// 重新设置种子，丢弃已有状态
    pub fn reseed(&mut self, seed: u64) {
        debug!("Reseeding random source: {} -> {}", self.seed, seed);
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// 从当前随机源派生子随机源（消耗一次抽取）
    pub fn fork(&mut self) -> Self {
        Self::new(self.rng.gen::<u64>())
    }

    /// [0, 1) 均匀分布实数
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// [0, bound) 均匀分布整数；bound 为 0 时返回 0
    pub fn below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }

    /// 公平硬币
    pub fn coin(&mut self) -> bool {
        self.uniform() < 0.5
    }

    /// 以概率 `p` 返回 true；p <= 0 永不成立，p >= 1 总是成立
    pub fn chance(&mut self, p: f64) -> bool {
        self.uniform() < p
    }

    /// 顺序按比例无放回抽样
    ///
    /// 依次遍历 `candidates` 个候选位置，第 k 个位置被选中的概率为
    /// `剩余需要数 / 剩余候选数`。恰好选出 `min(wanted, candidates)` 个位置，
    /// 且不偏向靠前的位置。返回升序的位置索引。
    pub fn select_sequential(&mut self, candidates: usize, wanted: usize) -> Vec<usize> {
        let mut remaining = wanted.min(candidates);
        let mut selected = Vec::with_capacity(remaining);

        for k in 0..candidates {
            if remaining == 0 {
                break;
            }
            let p = remaining as f64 / (candidates - k) as f64;
            if self.chance(p) {
                selected.push(k);
                remaining -= 1;
            }
        }

        selected
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
