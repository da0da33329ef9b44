/// Settings shared by the executor and the command-line front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Leading input rows to drop before the first step runs
    pub skip: usize,
    /// Field separator for reading and writing delimited text
    pub separator: char,
    /// Print the parsed steps before executing
    pub print_ops: bool,
    /// Print the display type of every result column
    pub print_types: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            skip: 0,
            separator: ',',
            print_ops: false,
            print_types: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// The separator as a single byte, if it is ASCII.
    pub fn delimiter(&self) -> Option<u8> {
        u8::try_from(self.separator).ok().filter(u8::is_ascii)
    }
}
