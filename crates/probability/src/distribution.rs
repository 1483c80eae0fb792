//! Distribution - 离散域上的概率分布
//!
//! 域元素按位置区分（允许值重复，查找取第一个匹配），
//! 原始权重非负；归一化权重惰性计算并缓存。

use crate::error::{ProbabilityError, Result};
use crate::utils;
use pragma_core::RandomSource;
use std::cell::OnceCell;

/// 离散概率分布
#[derive(Debug, Clone)]
pub struct Distribution<A> {
    /// 域
    domain: Vec<A>,

    /// 原始（未归一化）权重
    weights: Vec<f64>,

    /// 归一化权重（首次访问时计算）
    normalized: OnceCell<Vec<f64>>,
}

impl<A> Distribution<A> {
    /// 创建分布
    ///
    /// 权重必须有限且非负，长度必须与域一致。
    pub fn new(domain: Vec<A>, weights: Vec<f64>) -> Result<Self> {
        if domain.len() != weights.len() {
            return Err(ProbabilityError::DimensionMismatch {
                domain: domain.len(),
                weights: weights.len(),
            });
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(ProbabilityError::MalformedInput(format!(
                "weights must be finite and non-negative, got {bad}"
            )));
        }

        Ok(Self {
            domain,
            weights,
            normalized: OnceCell::new(),
        })
    }

    /// 均匀分布
    pub fn uniform(domain: Vec<A>) -> Self {
        let weights = vec![1.0; domain.len()];
        Self {
            domain,
            weights,
            normalized: OnceCell::new(),
        }
    }

    pub fn domain(&self) -> &[A] {
        &self.domain
    }

    /// 原始权重
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// 归一化权重；总和 <= 0 时退化为原始权重
    pub fn normalized(&self) -> &[f64] {
        self.normalized.get_or_init(|| utils::normalize(&self.weights))
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    /// (元素, 归一化概率) 迭代器
    pub fn iter(&self) -> impl Iterator<Item = (&A, f64)> {
        self.domain.iter().zip(self.normalized().iter().copied())
    }

    /// 采样一个位置
    ///
    /// 单元素域不消耗随机数。没有区间包含 u 时（全零权重或舍入误差）返回最后一个位置。
    pub fn sample_index(&self, rng: &mut RandomSource) -> Option<usize> {
        match self.domain.len() {
            0 => None,
            1 => Some(0),
            _ => {
                let u = rng.uniform();
                Some(utils::first_exceeding(self.normalized(), u))
            }
        }
    }

    /// 采样一个元素
    pub fn sample(&self, rng: &mut RandomSource) -> Option<&A> {
        self.sample_index(rng).map(|i| &self.domain[i])
    }

    /// n 次独立采样
    pub fn sample_many(&self, n: usize, rng: &mut RandomSource) -> Vec<&A> {
        (0..n).filter_map(|_| self.sample(rng)).collect()
    }

    pub fn arg_max_index(&self, rng: &mut RandomSource) -> Option<usize> {
        utils::arg_max(self.normalized(), rng)
    }

    /// 最大权重元素，平局时均匀随机选择
    pub fn arg_max(&self, rng: &mut RandomSource) -> Option<&A> {
        self.arg_max_index(rng).map(|i| &self.domain[i])
    }

    pub fn soft_arg_max_index(&self, beta: f64, rng: &mut RandomSource) -> Option<usize> {
        utils::soft_arg_max(self.normalized(), beta, rng)
    }

    /// 温度缩放的软 argmax；软化权重出现 NaN 时退回 argmax
    pub fn soft_arg_max(&self, beta: f64, rng: &mut RandomSource) -> Option<&A> {
        self.soft_arg_max_index(beta, rng).map(|i| &self.domain[i])
    }

    /// 香农熵（比特）
    pub fn entropy(&self) -> f64 {
        utils::entropy(self.normalized())
    }
}

impl<A: Clone> Distribution<A> {
    /// 原始权重乘以 k（k 必须有限且非负）
    pub fn scale_by(&self, k: f64) -> Result<Self> {
        if !k.is_finite() || k < 0.0 {
            return Err(ProbabilityError::MalformedInput(format!(
                "scale factor must be finite and non-negative, got {k}"
            )));
        }
        Ok(Self {
            domain: self.domain.clone(),
            weights: self.weights.iter().map(|w| w * k).collect(),
            normalized: OnceCell::new(),
        })
    }
}

impl<A: PartialEq> Distribution<A> {
    /// 第一个等于 `elem` 的元素的归一化概率
    pub fn probability_of(&self, elem: &A) -> Option<f64> {
        self.domain
            .iter()
            .position(|a| a == elem)
            .map(|i| self.normalized()[i])
    }
}

impl<A: PartialEq + Clone> Distribution<A> {
    /// 原始权重逐元素相加；域必须完全相同
    pub fn add_to(&self, other: &Self) -> Result<Self> {
        if self.domain != other.domain {
            return Err(ProbabilityError::DomainMismatch);
        }
        Ok(Self {
            domain: self.domain.clone(),
            weights: self
                .weights
                .iter()
                .zip(&other.weights)
                .map(|(a, b)| a + b)
                .collect(),
            normalized: OnceCell::new(),
        })
    }
}

impl Distribution<usize> {
    /// 以位置 0..n 为域的分布（矩阵行/列到选择的桥梁）
    pub fn over_indices(weights: Vec<f64>) -> Result<Self> {
        let domain = (0..weights.len()).collect();
        Self::new(domain, weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ab(weights: Vec<f64>) -> Distribution<char> {
        Distribution::new(vec!['a', 'b'], weights).unwrap()
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = Distribution::new(vec![1, 2, 3], vec![1.0]).unwrap_err();
        assert_eq!(
            err,
            ProbabilityError::DimensionMismatch {
                domain: 3,
                weights: 1
            }
        );
    }

    #[test]
    fn test_new_rejects_negative_weight() {
        assert!(matches!(
            Distribution::new(vec![1, 2], vec![1.0, -0.5]),
            Err(ProbabilityError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_probability_of() {
        let d = ab(vec![3.0, 1.0]);
        assert_eq!(d.probability_of(&'a'), Some(0.75));
        assert_eq!(d.probability_of(&'b'), Some(0.25));
        assert_eq!(d.probability_of(&'z'), None);
    }

    #[test]
    fn test_probability_of_duplicates_uses_first() {
        let d = Distribution::new(vec!['x', 'y', 'x'], vec![1.0, 2.0, 1.0]).unwrap();
        assert_eq!(d.probability_of(&'x'), Some(0.25));
    }

    #[test]
    fn test_zero_sum_degenerates_to_raw() {
        let d = ab(vec![0.0, 0.0]);
        assert_eq!(d.normalized(), &[0.0, 0.0]);
        assert_eq!(d.entropy(), 0.0);

        let mut rng = RandomSource::new(1);
        assert_eq!(d.sample(&mut rng), Some(&'b'));
    }

    #[test]
    fn test_sample_frequency() {
        let d = ab(vec![3.0, 1.0]);
        let mut rng = RandomSource::new(2024);

        let hits = d
            .sample_many(100_000, &mut rng)
            .into_iter()
            .filter(|c| **c == 'a')
            .count();
        let freq = hits as f64 / 100_000.0;

        assert!((freq - 0.75).abs() < 0.01, "frequency {freq}");
    }

    #[test]
    fn test_single_element_sample_does_not_draw() {
        let d = Distribution::new(vec!["only"], vec![0.0]).unwrap();
        let mut rng = RandomSource::new(5);
        let mut reference = RandomSource::new(5);

        assert_eq!(d.sample(&mut rng), Some(&"only"));
        assert_eq!(rng.uniform(), reference.uniform());
    }

    #[test]
    fn test_empty_distribution() {
        let d: Distribution<u8> = Distribution::new(vec![], vec![]).unwrap();
        let mut rng = RandomSource::new(0);
        assert_eq!(d.sample(&mut rng), None);
        assert_eq!(d.arg_max(&mut rng), None);
        assert_eq!(d.soft_arg_max(1.0, &mut rng), None);
    }

    #[test]
    fn test_entropy() {
        assert!((ab(vec![0.5, 0.5]).entropy() - 1.0).abs() < 1e-12);
        let single = Distribution::new(vec![()], vec![2.0]).unwrap();
        assert_eq!(single.entropy(), 0.0);
    }

    #[test]
    fn test_arg_max_never_picks_lower() {
        let d = Distribution::over_indices(vec![0.2, 0.5, 0.5]).unwrap();
        let mut seen = [0usize; 3];
        for seed in 0..1000 {
            let mut rng = RandomSource::new(seed);
            seen[*d.arg_max(&mut rng).unwrap()] += 1;
        }
        assert_eq!(seen[0], 0);
        assert!(seen[1] > 400 && seen[2] > 400, "{seen:?}");
    }

    #[test]
    fn test_soft_arg_max_prefers_heavier() {
        let d = ab(vec![1.0, 9.0]);
        let mut rng = RandomSource::new(8);
        let heavy = (0..5000)
            .filter(|_| d.soft_arg_max(10.0, &mut rng) == Some(&'b'))
            .count();
        assert!(heavy > 4500, "heavy {heavy}");
    }

    #[test]
    fn test_scale_and_add() {
        let d = ab(vec![1.0, 3.0]);
        let scaled = d.scale_by(2.0).unwrap();
        assert_eq!(scaled.weights(), &[2.0, 6.0]);
        assert_eq!(scaled.probability_of(&'a'), Some(0.25));

        let sum = d.add_to(&ab(vec![3.0, 1.0])).unwrap();
        assert_eq!(sum.weights(), &[4.0, 4.0]);
        assert_eq!(sum.probability_of(&'b'), Some(0.5));
    }

    #[test]
    fn test_add_requires_same_domain() {
        let d = ab(vec![1.0, 1.0]);
        let other = Distribution::new(vec!['a', 'c'], vec![1.0, 1.0]).unwrap();
        assert_eq!(d.add_to(&other).unwrap_err(), ProbabilityError::DomainMismatch);
    }

    #[test]
    fn test_scale_rejects_negative() {
        assert!(ab(vec![1.0, 1.0]).scale_by(-1.0).is_err());
    }
}
