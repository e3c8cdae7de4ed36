use anyhow::Result;

fn main() -> Result<()> {
    w2vgrep_cli::grep_entry()
}
