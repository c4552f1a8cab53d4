/// A ternary expression.  Rust's `if` is already an expression, but
/// `cargo fmt` spreads it over five lines, and the border rules for
/// wrap-around neighbors and DP predecessor windows read far better
/// as a compact table of `cq!(edge, this, that)` lines.
#[macro_export]
macro_rules! cq {
    ($condition: expr, $_true: expr, $_false: expr) => {
        if $condition {
            $_true
        } else {
            $_false
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn picks_the_matching_branch() {
        let width = 4u32;
        let wrap_left = |x: u32| cq!(x == 0, width - 1, x - 1);
        assert_eq!(wrap_left(0), 3);
        assert_eq!(wrap_left(2), 1);
    }
}
