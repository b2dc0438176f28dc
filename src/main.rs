//! sockidl CLI entry point

fn main() {
    sockidl::cli::run();
}
