// 추세 판단에 쓰이는 기술적 지표 모듈
// 이동평균, RSI, 변동성, 추세 부호 계산을 제공합니다.

pub mod ma;
pub mod rsi;
pub mod utils;
pub mod volatility;

pub use ma::MA;
pub use ma::sma::SMA;
pub use rsi::RSI;
pub use utils::trend_sign;
pub use volatility::Volatility;
