// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A read-only collection of puzzles, loaded from JSON.
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use hashbrown::HashSet;

use crate::puzzle::{ObjectiveKind, Puzzle};
use crate::types::BoardSize;
use crate::validator::ValidationReport;

const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "failed to read puzzles: {}", err),
            LoadError::Json(err) => write!(f, "malformed puzzle data: {}", err),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Json(err) => Some(err),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> LoadError {
        LoadError::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> LoadError {
        LoadError::Json(err)
    }
}

/// Puzzle files are either a bare array of puzzles or an object with a `puzzles` array.
#[derive(Deserialize)]
#[serde(untagged)]
enum PuzzleFile {
    List(Vec<Puzzle>),
    Wrapped { puzzles: Vec<Puzzle> },
}

impl PuzzleFile {
    fn into_puzzles(self) -> Vec<Puzzle> {
        match self {
            PuzzleFile::List(puzzles) => puzzles,
            PuzzleFile::Wrapped { puzzles } => puzzles,
        }
    }
}

/// Criteria for narrowing the library. Unset fields match every puzzle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filters {
    pub size: Option<BoardSize>,
    pub difficulty: Option<u8>,
    pub objective: Option<ObjectiveKind>,
    pub pack: Option<String>,
}

impl Filters {
    pub fn matches(&self, puzzle: &Puzzle) -> bool {
        self.size.map_or(true, |size| puzzle.size == size)
            && self.difficulty.map_or(true, |d| puzzle.difficulty == d)
            && self.objective.map_or(true, |kind| puzzle.objective.kind == kind)
            && self.pack.as_ref().map_or(true, |pack| &puzzle.pack == pack)
    }
}

#[derive(Clone, Debug, Default)]
pub struct PuzzleLibrary {
    puzzles: Vec<Puzzle>,
}

impl PuzzleLibrary {
    pub fn new(puzzles: Vec<Puzzle>) -> PuzzleLibrary {
        {
            let mut seen = HashSet::new();
            for puzzle in &puzzles {
                if !seen.insert(puzzle.id.as_str()) {
                    warn!("duplicate puzzle id {}, lookups return the first", puzzle.id);
                }
            }
        }

        PuzzleLibrary { puzzles }
    }

    pub fn from_json_str(json: &str) -> Result<PuzzleLibrary, LoadError> {
        let file: PuzzleFile = serde_json::from_str(json)?;
        Ok(PuzzleLibrary::new(file.into_puzzles()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<PuzzleLibrary, LoadError> {
        let file: PuzzleFile = serde_json::from_reader(reader)?;
        Ok(PuzzleLibrary::new(file.into_puzzles()))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<PuzzleLibrary, LoadError> {
        let path = path.as_ref();
        info!("loading puzzles from {}", path.display());
        let file = File::open(path)?;
        let library = PuzzleLibrary::from_reader(BufReader::new(file))?;
        info!("loaded {} puzzles", library.len());
        Ok(library)
    }

    pub fn all(&self) -> &[Puzzle] {
        &self.puzzles
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Option<&Puzzle> {
        self.puzzles.iter().find(|p| p.id == id)
    }

    /// The puzzle of the day. Every caller sees the same puzzle on the same day; the library
    /// is cycled through in order. `None` only if the library is empty.
    pub fn daily(&self, days_since_epoch: u64) -> Option<&Puzzle> {
        if self.puzzles.is_empty() {
            return None;
        }

        let index = (days_since_epoch % self.puzzles.len() as u64) as usize;
        self.puzzles.get(index)
    }

    /// The puzzle of the day for the UTC day containing `time`.
    pub fn daily_for(&self, time: SystemTime) -> Option<&Puzzle> {
        let days = time
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() / SECONDS_PER_DAY)
            .unwrap_or(0);
        self.daily(days)
    }

    pub fn filter(&self, filters: &Filters) -> Vec<&Puzzle> {
        self.puzzles.iter().filter(|p| filters.matches(p)).collect()
    }

    /// Distinct pack names, sorted.
    pub fn packs(&self) -> Vec<&str> {
        let distinct: HashSet<&str> = self.puzzles.iter().map(|p| p.pack.as_str()).collect();
        let mut packs: Vec<&str> = distinct.into_iter().collect();
        packs.sort();
        packs
    }

    /// Distinct objective kinds, sorted.
    pub fn objective_kinds(&self) -> Vec<ObjectiveKind> {
        let mut kinds: Vec<ObjectiveKind> =
            self.puzzles.iter().map(|p| p.objective.kind).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    /// The puzzles offered to players. In dev mode, puzzles that failed validation are hidden
    /// so broken content is never served; outside dev mode every puzzle is offered.
    pub fn playable<'a>(&'a self, report: &ValidationReport, dev_mode: bool) -> Vec<&'a Puzzle> {
        if !dev_mode {
            return self.puzzles.iter().collect();
        }

        let failed: HashSet<&str> = report
            .failures()
            .map(|r| r.puzzle_id.as_str())
            .collect();
        if !failed.is_empty() {
            warn!("hiding {} puzzles that failed validation", failed.len());
        }

        self.puzzles
            .iter()
            .filter(|p| !failed.contains(p.id.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{validate_all, BatchOptions};

    const PUZZLES: &str = r#"[
        {
            "id": "a",
            "pack": "Beginner",
            "size": 5,
            "difficulty": 1,
            "sideToMoveFirst": "w",
            "pieces": [
                { "kind": "K", "side": "w", "x": 0, "y": 0 },
                { "kind": "R", "side": "w", "x": 0, "y": 3 },
                { "kind": "K", "side": "b", "x": 4, "y": 4 },
                { "kind": "P", "side": "b", "x": 3, "y": 3 },
                { "kind": "P", "side": "b", "x": 4, "y": 3 }
            ],
            "objective": { "kind": "mate", "depth": 1 },
            "line": [ { "side": "w", "from": [0, 3], "to": [0, 4] } ]
        },
        {
            "id": "b",
            "pack": "Advanced",
            "size": 6,
            "difficulty": 3,
            "sideToMoveFirst": "w",
            "pieces": [
                { "kind": "K", "side": "w", "x": 0, "y": 0 },
                { "kind": "K", "side": "b", "x": 5, "y": 5 }
            ],
            "objective": { "kind": "mate", "depth": 1 },
            "line": []
        },
        {
            "id": "c",
            "pack": "Beginner",
            "size": 5,
            "difficulty": 2,
            "sideToMoveFirst": "b",
            "pieces": [
                { "kind": "K", "side": "w", "x": 0, "y": 0 },
                { "kind": "K", "side": "b", "x": 4, "y": 4 }
            ],
            "objective": { "kind": "mate", "depth": 1 },
            "line": []
        }
    ]"#;

    fn library() -> PuzzleLibrary {
        PuzzleLibrary::from_json_str(PUZZLES).unwrap()
    }

    #[test]
    fn load_and_lookup() {
        let lib = library();
        assert_eq!(3, lib.len());
        assert_eq!(Some("b"), lib.by_id("b").map(|p| p.id.as_str()));
        assert!(lib.by_id("z").is_none());
    }

    #[test]
    fn duplicate_ids_keep_the_first() {
        let mut puzzles = library().all().to_vec();
        let mut copy = puzzles[0].clone();
        copy.title = "second copy".to_owned();
        puzzles.push(copy);

        let lib = PuzzleLibrary::new(puzzles);
        assert_eq!(4, lib.len());
        assert_eq!(Some(""), lib.by_id("a").map(|p| p.title.as_str()));
    }

    #[test]
    fn wrapped_file() {
        let wrapped = format!("{{ \"puzzles\": {} }}", PUZZLES);
        let lib = PuzzleLibrary::from_json_str(&wrapped).unwrap();
        assert_eq!(3, lib.len());
    }

    #[test]
    fn malformed_json() {
        match PuzzleLibrary::from_json_str("[{ \"id\": 3 }]") {
            Err(LoadError::Json(_)) => {}
            other => panic!("expected a json error, got {:?}", other),
        }
    }

    #[test]
    fn missing_file() {
        match PuzzleLibrary::from_path("/nonexistent/puzzles.json") {
            Err(LoadError::Io(_)) => {}
            other => panic!("expected an io error, got {:?}", other),
        }
    }

    #[test]
    fn daily_cycles() {
        let lib = library();
        assert_eq!("a", lib.daily(0).unwrap().id);
        assert_eq!("b", lib.daily(4).unwrap().id);
        assert_eq!("c", lib.daily(17_000 * 3 + 2).unwrap().id);
        assert!(PuzzleLibrary::default().daily(7).is_none());
    }

    #[test]
    fn daily_for_time() {
        let lib = library();
        let day_one = UNIX_EPOCH + std::time::Duration::from_secs(SECONDS_PER_DAY + 5);
        assert_eq!("b", lib.daily_for(day_one).unwrap().id);
    }

    #[test]
    fn filters() {
        let lib = library();
        let ids = |filters: Filters| -> Vec<String> {
            lib.filter(&filters).iter().map(|p| p.id.clone()).collect()
        };

        assert_eq!(vec!["a", "b", "c"], ids(Filters::default()));
        assert_eq!(
            vec!["a", "c"],
            ids(Filters {
                size: Some(BoardSize::new(5).unwrap()),
                ..Filters::default()
            })
        );
        assert_eq!(
            vec!["c"],
            ids(Filters {
                pack: Some("Beginner".to_owned()),
                difficulty: Some(2),
                ..Filters::default()
            })
        );
        assert!(ids(Filters {
            pack: Some("Expert".to_owned()),
            ..Filters::default()
        })
        .is_empty());
    }

    #[test]
    fn packs_and_objectives() {
        let lib = library();
        assert_eq!(vec!["Advanced", "Beginner"], lib.packs());
        assert_eq!(vec![ObjectiveKind::Mate], lib.objective_kinds());
    }

    #[test]
    fn playable_hides_failures_in_dev_mode() {
        let lib = library();
        let report = validate_all(lib.all(), &BatchOptions::default());
        assert_eq!(1, report.passed_puzzles);

        assert_eq!(3, lib.playable(&report, false).len());
        let shown: Vec<_> = lib.playable(&report, true).iter().map(|p| p.id.clone()).collect();
        assert_eq!(vec!["a"], shown);
    }
}
