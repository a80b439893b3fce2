use std::path::PathBuf;

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let out_dir = PathBuf::from(out_dir);

    let ifiles = ["proto/overseer.proto", "proto/overseer_gossip.proto"];
    let include_dirs = ["proto"];
    let fd_path = out_dir.join("overseer_descriptor.bin");

    let fds = protox::compile(ifiles, include_dirs).unwrap();

    // prost-build only writes the descriptor set when it runs protoc itself,
    // so write it explicitly for tonic::include_file_descriptor_set!.
    std::fs::write(&fd_path, prost::Message::encode_to_vec(&fds)).unwrap();

    tonic_build::configure()
        .out_dir(out_dir)
        .file_descriptor_set_path(fd_path)
        .compile_fds(fds)
        .unwrap();
}
