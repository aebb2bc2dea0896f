const PRETTY_ENV: &str = "RUST_LOG_PRETTY";

fn main() {
    println!("cargo::rustc-check-cfg=cfg(tracing_pretty)");
    println!("cargo::rerun-if-env-changed={PRETTY_ENV}");

    if std::env::var_os(PRETTY_ENV).is_some_and(|value| value == "1") {
        println!("cargo::rustc-cfg=tracing_pretty");
    }
}
