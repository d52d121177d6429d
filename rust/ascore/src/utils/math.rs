use std::sync::{
    LazyLock,
    RwLock,
};

/// Largest `n` whose log-factorial is kept as an exact cumulative sum.
pub const LOG_FACTORIAL_CACHE_LIMIT: usize = 1024;
const INITIAL_CACHE_SIZE: usize = 64;

/// Grow-only table of `ln(n!)` shared across threads.
#[derive(Debug)]
pub struct LogFactorialCache {
    table: RwLock<Vec<f64>>,
    limit: usize,
}

impl LogFactorialCache {
    pub fn new(limit: usize) -> Self {
        let mut table = vec![0.0];
        extend_table(&mut table, INITIAL_CACHE_SIZE.min(limit));
        Self {
            table: RwLock::new(table),
            limit,
        }
    }

    pub fn ln_factorial(&self, n: usize) -> f64 {
        if n > self.limit {
            return stirling_ln_factorial(n);
        }
        {
            let table = self.table.read().unwrap_or_else(|e| e.into_inner());
            if let Some(x) = table.get(n) {
                return *x;
            }
        }
        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        extend_table(&mut table, n);
        table[n]
    }

    /// `ln(n choose k)`.
    pub fn ln_choose(&self, n: usize, k: usize) -> f64 {
        if k > n {
            return f64::NEG_INFINITY;
        }
        self.ln_factorial(n) - self.ln_factorial(k) - self.ln_factorial(n - k)
    }

    pub fn cached_len(&self) -> usize {
        self.table.read().map(|t| t.len()).unwrap_or(0)
    }
}

fn extend_table(table: &mut Vec<f64>, up_to: usize) {
    while table.len() <= up_to {
        let k = table.len();
        let last = table[k - 1];
        table.push(last + (k as f64).ln());
    }
}

/// Stirling series for `ln(n!)`, accurate well below 1e-10 for n > 100.
fn stirling_ln_factorial(n: usize) -> f64 {
    let x = n as f64;
    x * x.ln() - x + 0.5 * (2.0 * std::f64::consts::PI * x).ln() + 1.0 / (12.0 * x)
        - 1.0 / (360.0 * x.powi(3))
        + 1.0 / (1260.0 * x.powi(5))
}

static LOG_FACTORIALS: LazyLock<LogFactorialCache> =
    LazyLock::new(|| LogFactorialCache::new(LOG_FACTORIAL_CACHE_LIMIT));

/// `ln(n!)` from the process-wide cache.
pub fn ln_factorial(n: usize) -> f64 {
    LOG_FACTORIALS.ln_factorial(n)
}

/// `ln(n choose k)` from the process-wide cache.
pub fn ln_choose(n: usize, k: usize) -> f64 {
    LOG_FACTORIALS.ln_choose(n, k)
}

/// `ln(sum(exp(x)))` without overflow.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    max + values.iter().map(|x| (x - max).exp()).sum::<f64>().ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_factorials_are_exact() {
        let cache = LogFactorialCache::new(50);
        assert_eq!(cache.ln_factorial(0), 0.0);
        assert_eq!(cache.ln_factorial(1), 0.0);
        assert!((cache.ln_factorial(5) - 120f64.ln()).abs() < 1e-12);
        assert!((cache.ln_choose(10, 3) - 120f64.ln()).abs() < 1e-10);
        assert_eq!(cache.ln_choose(3, 4), f64::NEG_INFINITY);
    }

    #[test]
    fn test_cache_grows_on_demand() {
        let cache = LogFactorialCache::new(500);
        let before = cache.cached_len();
        let _ = cache.ln_factorial(300);
        assert!(cache.cached_len() > before);
        assert_eq!(cache.cached_len(), 301);
    }

    #[test]
    fn test_stirling_agrees_with_exact_sum() {
        let cache = LogFactorialCache::new(2000);
        for n in [150, 700, 1999] {
            let exact = cache.ln_factorial(n);
            let approx = stirling_ln_factorial(n);
            assert!((exact - approx).abs() / exact < 1e-10, "{n}");
        }
    }

    #[test]
    fn test_shared_cache_from_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| std::thread::spawn(move || ln_factorial(200 + i * 100)))
            .collect();
        for h in handles {
            assert!(h.join().unwrap() > 0.0);
        }
    }

    #[test]
    fn test_log_sum_exp() {
        let x = log_sum_exp(&[1000.0, 1000.0]);
        assert!((x - (1000.0 + 2f64.ln())).abs() < 1e-9);
        assert_eq!(log_sum_exp(&[]), f64::NEG_INFINITY);
    }
}
