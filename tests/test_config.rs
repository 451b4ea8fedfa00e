use fake_grpclb::config::{
    Args, Config, FileConfig, TlsPaths, TransportSecurity, DEFAULT_BACKEND_PORT, DEFAULT_PORT,
};
use std::path::PathBuf;

fn temp_yaml(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "fake-grpclb-{}-{}.yaml",
        name,
        std::process::id()
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_config_defaults_in_insecure_mode() {
    let cfg = Config::from_args(["fake-grpclb", "--insecure"]).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.backend_port, DEFAULT_BACKEND_PORT);
    assert_eq!(cfg.security, TransportSecurity::Insecure);
    assert!(cfg.is_insecure());
}

#[test]
fn test_config_go_style_flags() {
    let cfg = Config::from_args([
        "fake-grpclb",
        "-port=11000",
        "-backend_port",
        "21000",
        "-insecure",
    ])
    .unwrap();
    assert_eq!(cfg.port, 11000);
    assert_eq!(cfg.backend_port, 21000);
    assert!(cfg.is_insecure());
}

#[test]
fn test_config_debug_mode_alias() {
    let cfg = Config::from_args(["fake-grpclb", "-debug_mode"]).unwrap();
    assert!(cfg.is_insecure());

    let cfg = Config::from_args(["fake-grpclb", "--debug_mode=true"]).unwrap();
    assert!(cfg.is_insecure());
}

#[test]
fn test_config_secure_mode_requires_tls_material() {
    let err = Config::from_args(["fake-grpclb"]).unwrap_err();
    assert!(err.to_string().contains("--tls_cert"));

    let err = Config::from_args(["fake-grpclb", "-insecure=false", "--tls_cert", "a.pem"]).unwrap_err();
    assert!(err.to_string().contains("secure mode"));
}

#[test]
fn test_config_secure_mode_with_tls_flags() {
    let cfg = Config::from_args([
        "fake-grpclb",
        "-tls_cert=server.pem",
        "-tls_key=server.key",
        "-tls_client_ca=ca.pem",
    ])
    .unwrap();

    assert_eq!(
        cfg.security,
        TransportSecurity::MutualTls(TlsPaths {
            cert: PathBuf::from("server.pem"),
            key: PathBuf::from("server.key"),
            client_ca: PathBuf::from("ca.pem"),
        })
    );
    assert!(!cfg.is_insecure());
}

#[test]
fn test_config_rejects_bad_port() {
    assert!(Config::from_args(["fake-grpclb", "--insecure", "--port", "70000"]).is_err());
    assert!(Config::from_args(["fake-grpclb", "--insecure", "--backend_port", "abc"]).is_err());
}

#[test]
fn test_config_listen_on_all_interfaces() {
    let cfg = Config::from_args(["fake-grpclb", "--insecure", "--port", "5000"]).unwrap();
    let addr = cfg.listen_addr();
    assert!(addr.ip().is_unspecified());
    assert_eq!(addr.port(), 5000);
}

#[test]
fn test_config_from_yaml_file() {
    let path = temp_yaml(
        "file",
        "port: 12000\nbackend_port: 22000\ntls:\n  cert: c.pem\n  key: k.pem\n  client_ca: ca.pem\n",
    );

    let cfg = Config::from_args(["fake-grpclb".into(), "--config".into(), path.clone().into_os_string()])
        .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(cfg.port, 12000);
    assert_eq!(cfg.backend_port, 22000);
    assert!(matches!(cfg.security, TransportSecurity::MutualTls(_)));
}

#[test]
fn test_config_command_line_overrides_file() {
    let file = FileConfig::from_yaml("port: 12000\nbackend_port: 22000\ninsecure: false\n").unwrap();
    let args = Args {
        backend_port: Some(30000),
        insecure: Some(true),
        ..Args::default()
    };

    let cfg = Config::resolve(args, file).unwrap();
    assert_eq!(cfg.port, 12000);
    assert_eq!(cfg.backend_port, 30000);
    assert!(cfg.is_insecure());
}

#[test]
fn test_config_file_unknown_field_rejected() {
    assert!(FileConfig::from_yaml("listen: 0.0.0.0:1\n").is_err());
}

#[test]
fn test_config_missing_file_reported() {
    let err = Config::from_args(["fake-grpclb", "--config", "/nonexistent/fake-grpclb.yaml"]).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::from_args(["fake-grpclb", "--insecure"]).unwrap();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1, cfg2);
}
