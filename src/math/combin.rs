//! Binomial coefficients.

/// `C(n, k)`, or `None` if the value does not fit in a `u64`.
///
/// Uses the multiplicative form `C(n, i) = C(n, i-1) * (n - i + 1) / i`, which
/// stays exact because every intermediate value is itself a binomial coefficient.
pub fn binomial(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 1..=k as u128 {
        acc = acc * (n as u128 - i + 1) / i;
        if acc > u64::MAX as u128 {
            return None;
        }
    }
    Some(acc as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values() {
        assert_eq!(binomial(5, 2), Some(10));
        assert_eq!(binomial(10, 4), Some(210));
        assert_eq!(binomial(4, 4), Some(1));
        assert_eq!(binomial(4, 0), Some(1));
        assert_eq!(binomial(3, 5), Some(0));
    }

    #[test]
    fn symmetric() {
        assert_eq!(binomial(30, 7), binomial(30, 23));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(binomial(200, 100), None);
        assert_eq!(binomial(62, 31), Some(465_428_353_255_261_088));
    }
}
