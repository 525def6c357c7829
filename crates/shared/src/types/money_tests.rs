use super::*;
use rstest::rstest;
use rust_decimal_macros::dec;

#[rstest]
#[case(dec!(10.005), dec!(10.01))]
#[case(dec!(10.004), dec!(10.00))]
#[case(dec!(-10.005), dec!(-10.01))]
#[case(dec!(33.333333), dec!(33.33))]
#[case(dec!(0), dec!(0))]
fn test_round_money(#[case] input: Decimal, #[case] expected: Decimal) {
    assert_eq!(round_money(input), expected);
}

#[rstest]
#[case(dec!(0), "0,00 €")]
#[case(dec!(50), "50,00 €")]
#[case(dec!(1234.5), "1 234,50 €")]
#[case(dec!(77700), "77 700,00 €")]
#[case(dec!(1234567.891), "1 234 567,89 €")]
#[case(dec!(-40), "-40,00 €")]
fn test_format_euros(#[case] input: Decimal, #[case] expected: &str) {
    assert_eq!(format_euros(input), expected);
}
