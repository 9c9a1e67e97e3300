/// 가격 시계열의 추세 부호 계산
///
/// 연속 상승 횟수와 연속 하락 횟수를 비교합니다.
///
/// # Returns
/// * `1` - 상승이 더 많음
/// * `-1` - 하락이 더 많음
/// * `0` - 같거나 데이터가 2개 미만
pub fn trend_sign(prices: &[f64]) -> i8 {
    if prices.len() < 2 {
        return 0;
    }

    let (up_moves, down_moves) = prices.windows(2).fold((0usize, 0usize), |(up, down), w| {
        if w[1] > w[0] {
            (up + 1, down)
        } else if w[1] < w[0] {
            (up, down + 1)
        } else {
            (up, down)
        }
    });

    match up_moves.cmp(&down_moves) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
    }
}

/// 상대 변화율 |a - b| / b
///
/// 기준값이 0이면 무한대로 취급합니다.
pub fn relative_change(value: f64, base: f64) -> f64 {
    if base == 0.0 {
        return f64::INFINITY;
    }
    (value - base).abs() / base.abs()
}
