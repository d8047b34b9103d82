/// Output buffer with indentation tracking
pub(crate) struct Context {
    pretty: bool,
    depth: usize,
    buffer: String,
}

impl Context {
    pub fn new(pretty: bool) -> Self {
        Self {
            pretty,
            depth: 0,
            buffer: String::new(),
        }
    }

    pub fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn add_line(&mut self, text: &str) {
        if self.pretty {
            for _ in 0..self.depth {
                self.buffer.push_str("  ");
            }
        }
        self.add(text);
        if self.pretty {
            self.add("\n");
        }
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    pub fn get_output(self) -> String {
        self.buffer
    }
}
