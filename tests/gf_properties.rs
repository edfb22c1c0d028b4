use proptest::prelude::*;
use shardshare::gf;

proptest! {
    #[test]
    fn mul_inv_roundtrip_is_identity(a in 1u8..=255) {
        let inverse = gf::inv(a).unwrap();
        prop_assert_eq!(1u8, gf::mul(a, inverse));
        prop_assert_eq!(1u8, gf::mul(inverse, a));
    }

    #[test]
    fn add_is_its_own_inverse(a in any::<u8>(), b in any::<u8>()) {
        let sum = gf::add(a, b);
        prop_assert_eq!(a, gf::add(sum, b));
        prop_assert_eq!(0u8, gf::add(a, a));
    }

    #[test]
    fn mul_ct_matches_table_mul(a in any::<u8>(), b in any::<u8>()) {
        prop_assert_eq!(gf::mul(a, b), gf::mul_ct(a, b));
    }

    #[test]
    fn div_undoes_mul_for_nonzero_divisor(a in any::<u8>(), b in 1u8..=255) {
        let product = gf::mul(a, b);
        prop_assert_eq!(a, gf::div(product, b).unwrap());
    }

    #[test]
    fn pow_is_repeated_multiplication(a in any::<u8>(), n in 0u32..20) {
        let mut expected = 1u8;
        for _ in 0..n {
            expected = gf::mul(expected, a);
        }
        prop_assert_eq!(expected, gf::pow(a, n));
    }

    #[test]
    fn horner_matches_naive_evaluation(
        coeffs in prop::collection::vec(any::<u8>(), 1..12),
        x in any::<u8>(),
    ) {
        let mut expected = 0u8;
        for (i, &c) in coeffs.iter().enumerate() {
            expected = gf::add(expected, gf::mul(c, gf::pow(x, i as u32)));
        }
        prop_assert_eq!(expected, gf::horner_eval(&coeffs, x));
    }
}

#[test]
fn exp_log_roundtrip_for_every_nonzero_element() {
    for x in 1..=255u8 {
        let l = gf::inv(gf::inv(x).unwrap()).unwrap();
        assert_eq!(x, l);
    }
}

#[test]
fn zero_has_no_inverse_and_no_divisor_role() {
    assert!(gf::inv(0).is_err());
    assert!(gf::div(5, 0).is_err());
    assert_eq!(0, gf::div(0, 5).unwrap());
}
