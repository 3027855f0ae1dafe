use candle_matmul_latency::report::{self, Report};
use candle_matmul_latency::{
    bench, engine, plot, run_benchmark, select_device, Accelerator, Backend, BenchConfig, Error,
    Mode, Precision, Workload,
};

fn cpu_config(mode: Mode, repetitions: usize) -> BenchConfig {
    BenchConfig {
        backend: Backend::Cpu,
        size: 32,
        repetitions,
        mode,
        seed: Some(4096),
        ..Default::default()
    }
}

#[test]
fn per_sample_on_cpu() -> anyhow::Result<()> {
    let ctx = select_device(Backend::Cpu, 0)?;
    let w = Workload::provision(&ctx, 32, Precision::F32, Some(0))?;
    let result = engine::run(&ctx, &w, 10, Mode::PerSample)?;
    let samples = result.samples().unwrap();
    assert_eq!(samples.len(), 10);
    assert!(samples.iter().all(|&s| s >= 0.));
    let sum: f64 = samples.iter().sum();
    assert!((sum - result.total()).abs() < 1e-12);
    Ok(())
}

#[test]
fn aggregate_on_cpu() -> anyhow::Result<()> {
    let ctx = select_device(Backend::Cpu, 0)?;
    let w = Workload::provision(&ctx, 32, Precision::F16, Some(0))?;
    let result = engine::run(&ctx, &w, 40, Mode::Aggregate)?;
    assert_eq!(result.repetitions(), 40);
    assert!(result.total() >= 0.);
    assert!((result.mean_ms() - result.total() / 40. * 1000.).abs() < 1e-9);
    Ok(())
}

#[test]
fn operands_survive_the_run() -> anyhow::Result<()> {
    let ctx = select_device(Backend::Cpu, 0)?;
    let w = Workload::provision(&ctx, 16, Precision::F32, Some(1))?;
    let lhs = w.lhs().to_vec2::<f32>()?;
    let rhs = w.rhs().to_vec2::<f32>()?;
    engine::run(&ctx, &w, 5, Mode::PerSample)?;
    engine::run(&ctx, &w, 5, Mode::Aggregate)?;
    assert_eq!(w.lhs().to_vec2::<f32>()?, lhs);
    assert_eq!(w.rhs().to_vec2::<f32>()?, rhs);
    Ok(())
}

#[test]
fn unavailable_device_fails_before_provisioning() {
    let config = BenchConfig {
        backend: Backend::Cuda,
        ordinal: 4096,
        ..cpu_config(Mode::PerSample, 10)
    };
    match run_benchmark(&config) {
        Err(Error::DeviceUnavailable { backend, .. }) => assert_eq!(backend, Backend::Cuda),
        other => panic!("expected DeviceUnavailable, got {other:?}"),
    }
}

#[test]
fn invalid_config_fails_before_device_selection() {
    let config = BenchConfig {
        backend: Backend::Cuda,
        ordinal: 4096,
        repetitions: 0,
        ..Default::default()
    };
    assert!(matches!(
        run_benchmark(&config),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn end_to_end_outputs() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = BenchConfig {
        json: Some(dir.path().join("run.json")),
        csv: Some(dir.path().join("run.csv")),
        plot: Some(dir.path().join("run.svg")),
        ..cpu_config(Mode::PerSample, 12)
    };
    let outcome = run_benchmark(&config)?;
    assert_eq!(outcome.device, "cpu");
    assert_eq!(outcome.result.repetitions(), 12);

    let report = Report::new(&outcome.device, &config, &outcome.result);
    report::save_json(&report, config.json.as_ref().unwrap())?;
    report::save_csv(&outcome.result, config.csv.as_ref().unwrap())?;
    plot::save_svg(
        outcome.result.samples().unwrap(),
        "MatMul latency per iteration - cpu",
        config.plot.as_ref().unwrap(),
    )?;

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(config.json.as_ref().unwrap())?)?;
    assert_eq!(json["device"], "cpu");
    assert_eq!(json["mode"], "per-sample");
    assert_eq!(json["repetitions"], 12);
    assert_eq!(json["config"]["size"], 32);
    assert_eq!(json["samples"].as_array().map(|s| s.len()), Some(12));
    assert_eq!(json["stats"]["count"], 12);

    let csv = std::fs::read_to_string(config.csv.as_ref().unwrap())?;
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("iteration,latency_s"));
    assert_eq!(lines.count(), 12);

    let svg = std::fs::read_to_string(config.plot.as_ref().unwrap())?;
    assert!(svg.contains("<polyline"));
    Ok(())
}

#[test]
fn aggregate_csv_has_only_header() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let ctx = select_device(Backend::Cpu, 0)?;
    let config = cpu_config(Mode::Aggregate, 3);
    let result = bench::run_on(&ctx, &config)?;
    let path = dir.path().join("agg.csv");
    report::save_csv(&result, &path)?;
    assert_eq!(std::fs::read_to_string(&path)?, "iteration,latency_s\n");
    assert_eq!(ctx.label(), "cpu");
    Ok(())
}

#[test]
fn run_on_checks_config_itself() -> anyhow::Result<()> {
    let ctx = select_device(Backend::Cpu, 0)?;
    let config = BenchConfig {
        plot: Some("latency.svg".into()),
        ..cpu_config(Mode::Aggregate, 3)
    };
    assert!(matches!(
        bench::run_on(&ctx, &config),
        Err(Error::InvalidConfig(_))
    ));
    Ok(())
}
