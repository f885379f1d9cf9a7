/// `--input <path> [--output <path>]` as taken by the workspace binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoArgs {
    pub input: String,
    pub output: Option<String>,
}

impl IoArgs {
    /// Parse arguments after the program name. Unknown flags are skipped.
    /// Returns `None` when `--input` is missing or a flag has no value.
    pub fn parse(args: &[String]) -> Option<IoArgs> {
        let mut input = None;
        let mut output = None;
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--input" => { input = Some(args.get(i + 1)?.clone()); i += 2; }
                "--output" => { output = Some(args.get(i + 1)?.clone()); i += 2; }
                _ => { i += 1; }
            }
        }
        Some(IoArgs { input: input?, output })
    }
}
