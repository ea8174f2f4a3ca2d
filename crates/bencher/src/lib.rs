//! Shared fixtures for the benchmarks.

/// A raw http request kept as a benchmark input.
#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    /// The whole request, head and body.
    pub fn content(&self) -> &'static str {
        self.content
    }

    /// The request body: everything after the first empty line.
    pub fn body(&self) -> &'static str {
        self.content.split_once("\r\n\r\n").map_or("", |(_, body)| body)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, file: TestFile) -> Self {
        Self { name, file }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }
}
