//! Small combinatorial and number-theoretic helpers.

/// Iterate over all unordered factor pairs `(i, j)` with `i < j < n`.
///
/// Pairs come in row-major order of the upper triangle, which fixes the
/// order second-order effects are computed in.
///
/// # Examples
///
/// ```
/// use simdec::utils::factor_pairs;
///
/// let pairs: Vec<(usize, usize)> = factor_pairs(3).collect();
/// assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
/// assert_eq!(factor_pairs(1).count(), 0);
/// ```
pub fn factor_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> + Clone {
    (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
}

/// Test if a number is prime by trial division.
///
/// # Examples
///
/// ```
/// use simdec::utils::is_prime;
///
/// assert!(is_prime(2));
/// assert!(!is_prime(9));
/// assert!(is_prime(97));
/// ```
#[must_use]
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3u32;
    while d.saturating_mul(d) <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// The first `count` primes, in increasing order.
///
/// # Examples
///
/// ```
/// use simdec::utils::first_primes;
///
/// assert_eq!(first_primes(5), vec![2, 3, 5, 7, 11]);
/// ```
#[must_use]
pub fn first_primes(count: usize) -> Vec<u32> {
    (2u32..).filter(|&n| is_prime(n)).take(count).collect()
}

/// Product of state counts, the number of scenarios they span.
///
/// Returns `None` on overflow.
#[must_use]
pub fn scenario_count(state_counts: &[usize]) -> Option<usize> {
    state_counts
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
}
