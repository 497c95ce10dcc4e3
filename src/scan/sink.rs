// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Durable findings file

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::xss::Finding;

/// Findings file: one URL per line, flushed per finding
#[derive(Debug)]
pub struct FindingSink {
    path: PathBuf,
    file: File,
    written: usize,
}

impl FindingSink {
    /// Create or truncate the findings file
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            file,
            written: 0,
        })
    }

    /// Append one finding and flush it to the OS
    pub fn write(&mut self, finding: &Finding) -> Result<()> {
        writeln!(self.file, "{}", finding.url)?;
        self.file.flush()?;
        self.written += 1;
        Ok(())
    }

    /// Flush and sync to disk
    pub fn close(mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }

    /// Get file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Findings written so far
    pub fn written(&self) -> usize {
        self.written
    }
}
