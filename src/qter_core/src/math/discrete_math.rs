/// Calculate the GCD of two numbers
#[must_use]
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    loop {
        if b == 0 {
            return a;
        }

        let rem = a % b;
        a = b;
        b = rem;
    }
}

/// Calculate the LCM of two numbers
///
/// # Panics
///
/// Panics if either number is zero.
#[must_use]
pub fn lcm(a: u64, b: u64) -> u64 {
    assert_ne!(a, 0);
    assert_ne!(b, 0);

    b / gcd(a, b) * a
}

/// Calculate the LCM of a list of numbers. The LCM of nothing is one.
pub fn lcm_iter(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(1, lcm)
}
