use anyhow::Result;

fn main() -> Result<()> {
    comping::logger::init()?;
    comping::repl::start()
}
