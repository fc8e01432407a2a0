fn main() -> anyhow::Result<()> {
    chairlink_lib::run()
}
