fn main() -> std::io::Result<()> {
    refleksija_lib::run()
}
