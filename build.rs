use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Prefer an operator-supplied protoc, fall back to the vendored binary.
    if std::env::var_os("PROTOC").is_none() {
        let protoc = protoc_bin_vendored::protoc_bin_path()?;
        unsafe {
            std::env::set_var("PROTOC", protoc);
        }
    }

    let includes = [
        PathBuf::from("proto"),
        protoc_bin_vendored::include_path()?,
    ];

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/grpc/lb/v1/load_balancer.proto"], &includes)?;

    println!("cargo:rerun-if-changed=proto");
    Ok(())
}
