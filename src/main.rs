fn main() -> anyhow::Result<()> {
    living_room::run(living_room::Config::from_env())
}
