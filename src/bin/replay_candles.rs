use log::{debug, error, info, warn};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use swing_pivot::alert::LogAlertSink;
use swing_pivot::config::EngineConfig;
use swing_pivot::config_loader::{ConfigFormat, ConfigLoader};
use swing_pivot::model::Sample;
use swing_pivot::PivotEngine;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    debug!("커맨드 라인 인수: {:?}", args);

    if args.len() < 2 {
        println!("사용법: {} <캔들_JSON_파일> [설정_파일_경로]", args[0]);
        return ExitCode::FAILURE;
    }

    let config = if args.len() >= 3 {
        let path = PathBuf::from(&args[2]);
        match ConfigLoader::load_from_file::<EngineConfig>(&path, ConfigFormat::Auto) {
            Ok(config) => config,
            Err(e) => {
                error!("설정 로드 실패: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        debug!("기본 설정 사용");
        EngineConfig::default()
    };

    let samples: Vec<Sample> = match std::fs::read_to_string(&args[1])
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(samples) => samples,
        Err(e) => {
            error!("캔들 파일 읽기 실패: {} - {}", args[1], e);
            return ExitCode::FAILURE;
        }
    };

    let mut engine = match PivotEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("엔진 생성 실패: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("캔들 {}개 재생 시작", samples.len());
    let mut sink = LogAlertSink::default();
    for sample in samples {
        engine.ingest_into(sample, &mut sink);
    }
    info!(
        "재생 완료: 피벗 {}개, 알림 {}건",
        engine.store().len(),
        sink.delivered
    );

    let snapshot = engine.snapshot();
    if snapshot.is_empty() {
        warn!("확정된 피벗 없음");
    }

    match snapshot.to_json() {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("스냅샷 직렬화 실패: {}", e);
            ExitCode::FAILURE
        }
    }
}
