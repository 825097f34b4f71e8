//! Reading generation files from a results directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, info};
use regex::Regex;

use crate::ResultSource;
use crate::data::{Generation, RunResults};
use crate::error::ResultsError;

/// How generation files are sequenced before they become generations 1..N.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenerationOrder {
    /// Whatever order the directory listing yields. Not stable across filesystems.
    Listing,
    /// Sorted by file name; expects zero-padded indices such as `gen_007.json`.
    #[default]
    Lexical,
    /// Sorted by the last run of digits in the file stem, so `gen_2` precedes `gen_10`.
    Numeric,
}

/// Loads every regular file in a directory as one generation of bot records.
#[derive(Debug, Clone)]
pub struct ResultLoader {
    dir: PathBuf,
    order: GenerationOrder,
}

impl ResultLoader {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            order: GenerationOrder::default(),
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: GenerationOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub const fn order(&self) -> GenerationOrder {
        self.order
    }

    /// Load the run, one generation per file.
    ///
    /// # Errors
    ///
    /// Returns [`ResultsError::Io`] if the directory or a file cannot be read,
    /// [`ResultsError::Parse`] if a file is not an array of bot records,
    /// [`ResultsError::EmptyGeneration`] if a file holds no records, and the
    /// ordering errors described on [`order_files`].
    pub fn load(&self) -> Result<RunResults, ResultsError> {
        info!("loading run results from {}", self.dir.display());
        let files = order_files(self.generation_files()?, self.order)?;

        let mut generations = Vec::with_capacity(files.len());
        for (idx, path) in files.into_iter().enumerate() {
            let number = idx + 1;
            let generation = read_generation(&path)?;
            if generation.is_empty() {
                return Err(ResultsError::EmptyGeneration { generation: number });
            }
            debug!(
                "generation {number}: {} bots from {}",
                generation.len(),
                path.display()
            );
            generations.push(generation);
        }

        let run = RunResults::new(generations);
        info!(
            "loaded {} generations ({} bots) from {}",
            run.len(),
            run.bot_count(),
            self.dir.display()
        );
        Ok(run)
    }

    fn generation_files(&self) -> Result<Vec<PathBuf>, ResultsError> {
        let entries = fs::read_dir(&self.dir).map_err(|err| ResultsError::io(&self.dir, err))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|err| ResultsError::io(&self.dir, err))?.path();
            // Follows symlinks; a dangling link is not a file.
            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => files.push(path),
                Ok(_) => debug!("skipping non-file entry {}", path.display()),
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    debug!("skipping dangling entry {}", path.display());
                }
                Err(err) => return Err(ResultsError::io(path, err)),
            }
        }
        Ok(files)
    }
}

impl ResultSource for ResultLoader {
    type Error = ResultsError;

    fn load_run_results(&self) -> Result<RunResults, Self::Error> {
        self.load()
    }
}

/// Load `dir` with the default [`GenerationOrder`].
///
/// # Errors
///
/// See [`ResultLoader::load`].
pub fn load_run_results(dir: impl AsRef<Path>) -> Result<RunResults, ResultsError> {
    ResultLoader::new(dir.as_ref()).load()
}

/// Read and parse a single generation file.
///
/// # Errors
///
/// Returns [`ResultsError::Io`] if the file cannot be opened or read and
/// [`ResultsError::Parse`] if its bytes are not a JSON array of bot records.
pub fn read_generation(path: &Path) -> Result<Generation, ResultsError> {
    let bytes = fs::read(path).map_err(|err| ResultsError::io(path, err))?;
    let generation =
        Generation::from_slice(&bytes).map_err(|err| ResultsError::parse(path, err))?;
    Ok(generation.with_source(path))
}

/// Sequence generation files according to `order`.
///
/// # Errors
///
/// With [`GenerationOrder::Numeric`], returns [`ResultsError::Unnumbered`] for a
/// file stem without digits and [`ResultsError::DuplicateGeneration`] when two
/// files carry the same number. With [`GenerationOrder::Lexical`], when every
/// stem carries a number, returns [`ResultsError::Misordered`] if name order
/// disagrees with number order and [`ResultsError::DuplicateGeneration`] for
/// repeated numbers.
pub fn order_files(
    mut files: Vec<PathBuf>,
    order: GenerationOrder,
) -> Result<Vec<PathBuf>, ResultsError> {
    match order {
        GenerationOrder::Listing => Ok(files),
        GenerationOrder::Lexical => {
            files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
            check_lexical_numbering(&files)?;
            Ok(files)
        }
        GenerationOrder::Numeric => {
            let mut numbered = Vec::with_capacity(files.len());
            for path in files {
                let Some(number) = generation_number(&path) else {
                    return Err(ResultsError::Unnumbered { path });
                };
                numbered.push((number, path));
            }
            numbered.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

            for pair in numbered.windows(2) {
                if pair[0].0 == pair[1].0 {
                    return Err(ResultsError::DuplicateGeneration {
                        generation: pair[0].0.to_string(),
                        first: pair[0].1.clone(),
                        second: pair[1].1.clone(),
                    });
                }
            }
            Ok(numbered.into_iter().map(|(_, path)| path).collect())
        }
    }
}

// Unpadded names such as gen_1, gen_2, gen_10 sort as 1, 10, 2.
fn check_lexical_numbering(files: &[PathBuf]) -> Result<(), ResultsError> {
    let Some(numbers) = files
        .iter()
        .map(|path| generation_number(path))
        .collect::<Option<Vec<_>>>()
    else {
        debug!("not every file name carries a number; keeping name order unchecked");
        return Ok(());
    };

    for (idx, pair) in numbers.windows(2).enumerate() {
        let (earlier, later) = (&files[idx], &files[idx + 1]);
        if pair[0] == pair[1] {
            return Err(ResultsError::DuplicateGeneration {
                generation: pair[0].to_string(),
                first: earlier.clone(),
                second: later.clone(),
            });
        }
        if pair[0] > pair[1] {
            return Err(ResultsError::Misordered {
                earlier: earlier.clone(),
                later: later.clone(),
            });
        }
    }
    Ok(())
}

/// Generation number parsed from a file stem; any number of digits.
///
/// Ordered by magnitude: leading zeros are dropped, then shorter digit runs
/// come first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GenerationNumber {
    // Field order gives the derived `Ord`.
    width: usize,
    digits: String,
}

impl GenerationNumber {
    fn from_digits(raw: &str) -> Self {
        let trimmed = raw.trim_start_matches('0');
        let digits = if trimmed.is_empty() { "0" } else { trimmed };
        Self {
            width: digits.len(),
            digits: digits.to_string(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.digits
    }
}

impl std::fmt::Display for GenerationNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.digits)
    }
}

/// The last run of ASCII digits in the file stem, e.g. `12` for `run3_gen12.json`.
#[must_use]
pub fn generation_number(path: &Path) -> Option<GenerationNumber> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS.get_or_init(|| Regex::new(r"[0-9]+").expect("digit pattern compiles"));

    let stem = path.file_stem()?.to_string_lossy();
    let found = digits.find_iter(&stem).last()?;
    Some(GenerationNumber::from_digits(found.as_str()))
}
