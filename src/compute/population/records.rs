//! Tab-separated population files.
//!
//! The first line holds column headers; each following line is one
//! individual: maternal and paternal alleles, the phenotype fields, the
//! subpopulation number and the alive flag. Booleans are written as `0`/`1`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use log::warn;
use thiserror::Error;

use super::{Metapopulation, PopulationContainer};
use crate::compute::genetics::{Diplotype, Gamete};
use crate::compute::individual::Individual;
use crate::compute::phenotype::{PHENOTYPE_COLUMNS, Phenotype};
use crate::schema::NUM_LOCI;

/// Number of tab-separated fields per individual.
pub const POPULATION_FIELDS: usize = 2 * NUM_LOCI + PHENOTYPE_COLUMNS.len() + 2;

/// Reasons a population file cannot be loaded.
///
/// Any of these makes the whole load unusable.
#[derive(Debug, Error)]
pub enum PopulationFileError {
    #[error("population file I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("population file has no header line")]
    MissingHeader,

    #[error("line {line}: expected {expected} fields, found {found}")]
    WrongFieldCount {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("line {line}: cannot parse {field} from {value:?}")]
    Malformed {
        line: usize,
        field: String,
        value: String,
    },

    #[error("line {line}: invalid subpopulation number {id} (have {count})")]
    InvalidSubpopulation { line: usize, id: usize, count: usize },

    #[error("line {line}: subpopulation {id} is full")]
    SubpopulationFull { line: usize, id: usize },

    #[error("expected {expected} individuals, read {found}")]
    CountMismatch { expected: usize, found: usize },
}

impl<C: PopulationContainer> Metapopulation<C> {
    /// Write every living individual, in container order, to `path`,
    /// replacing any existing file. Returns the number written.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<usize> {
        let mut out = BufWriter::new(File::create(path)?);
        let written = self.write_to(&mut out)?;
        out.flush()?;
        Ok(written)
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        writeln!(out, "{}", Individual::column_heads())?;
        let mut written = 0;
        for sp in self.iter() {
            for ind in sp.alive() {
                writeln!(out, "{ind}")?;
                written += 1;
            }
        }
        Ok(written)
    }

    /// Load individuals from `path` into their subpopulations.
    ///
    /// Every row must name a subpopulation in range that is not yet full.
    /// Dead individuals then are skipped. The load fails unless exactly
    /// `expected` living individuals are read.
    pub fn read_from_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        expected: usize,
    ) -> Result<usize, PopulationFileError> {
        let file = File::open(path.as_ref()).inspect_err(|e| {
            warn!("could not open {}: {e}", path.as_ref().display());
        })?;
        self.read_from(BufReader::new(file), expected)
    }

    pub fn read_from<R: BufRead>(
        &mut self,
        reader: R,
        expected: usize,
    ) -> Result<usize, PopulationFileError> {
        self.load(reader, expected).inspect_err(|e| warn!("{e}"))
    }

    fn load<R: BufRead>(
        &mut self,
        reader: R,
        expected: usize,
    ) -> Result<usize, PopulationFileError> {
        let mut lines = reader.lines();
        match lines.next() {
            Some(header) => {
                header?;
            }
            None => return Err(PopulationFileError::MissingHeader),
        }

        let heads = Individual::column_heads();
        let heads: Vec<&str> = heads.split('\t').collect();
        let mut found = 0;
        for (k, line) in lines.enumerate() {
            let line_no = k + 2;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let ind = parse_individual(&line, line_no, &heads)?;
            let id = ind.subpopulation;
            if id >= self.len() {
                return Err(PopulationFileError::InvalidSubpopulation {
                    line: line_no,
                    id,
                    count: self.len(),
                });
            }
            if self[id].is_full() {
                return Err(PopulationFileError::SubpopulationFull { line: line_no, id });
            }
            if !ind.is_alive() {
                continue;
            }
            self[id].add(ind);
            found += 1;
        }

        if found != expected {
            return Err(PopulationFileError::CountMismatch { expected, found });
        }
        Ok(found)
    }
}

fn parse_individual(
    line: &str,
    line_no: usize,
    heads: &[&str],
) -> Result<Individual, PopulationFileError> {
    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    if fields.len() != POPULATION_FIELDS {
        return Err(PopulationFileError::WrongFieldCount {
            line: line_no,
            found: fields.len(),
            expected: POPULATION_FIELDS,
        });
    }
    let field = |i: usize| Field {
        name: heads[i],
        value: fields[i],
        line: line_no,
    };

    let mut maternal = Gamete::default();
    let mut paternal = Gamete::default();
    for locus in 0..NUM_LOCI {
        maternal[locus] = field(locus).parse()?;
        paternal[locus] = field(NUM_LOCI + locus).parse()?;
    }

    let offset = 2 * NUM_LOCI;
    let mut real = [0.0; 13];
    for (i, value) in real.iter_mut().enumerate() {
        *value = field(offset + i).parse()?;
    }
    let group = field(offset + 13).parse()?;
    let member = field(offset + 14).parse()?;
    let female = field(offset + 15).flag()?;
    let subpopulation = field(offset + 16).parse()?;
    let alive = field(offset + 17).flag()?;

    Ok(Individual::from_parts(
        Diplotype::new(maternal, paternal),
        Phenotype::from_fields(real, group, member, female),
        subpopulation,
        alive,
    ))
}

struct Field<'a> {
    name: &'a str,
    value: &'a str,
    line: usize,
}

impl Field<'_> {
    fn parse<T: FromStr>(&self) -> Result<T, PopulationFileError> {
        self.value.parse().map_err(|_| self.malformed())
    }

    fn flag(&self) -> Result<bool, PopulationFileError> {
        match self.value {
            "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            _ => Err(self.malformed()),
        }
    }

    fn malformed(&self) -> PopulationFileError {
        PopulationFileError::Malformed {
            line: self.line,
            field: self.name.to_string(),
            value: self.value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::population::{SlotPopulation, SubPopulation};
    use std::io::Cursor;
    use tempfile::tempdir;

    fn sample(nsp: usize, per_sp: usize) -> Metapopulation {
        let mut mp: Metapopulation = Metapopulation::new(nsp, per_sp);
        for k in 0..nsp {
            for i in 0..per_sp {
                let x = (k * per_sp + i) as f64 * 0.1;
                let mut ind = Individual::from_gametes(
                    Gamete::new([x, -x, 0.25]),
                    Gamete::new([0.1, x / 3.0, -0.05]),
                    k,
                );
                ind.phenotype.set_quality(1.5);
                ind.phenotype.payoff = x * 1.234_567_891;
                ind.phenotype.group = i / 2 + 1;
                ind.phenotype.member = i % 2 + 1;
                ind.set_female(i % 3 == 0);
                mp[k].add(ind);
            }
        }
        mp
    }

    #[test]
    fn test_field_count_matches_headers() {
        assert_eq!(POPULATION_FIELDS, 24);
        assert_eq!(
            Individual::column_heads().split('\t').count(),
            POPULATION_FIELDS
        );
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pop.tsv");
        let original = sample(3, 4);
        assert_eq!(original.write_to_file(&path).unwrap(), 12);

        let mut loaded: Metapopulation = Metapopulation::new(3, 4);
        assert_eq!(loaded.read_from_file(&path, 12).unwrap(), 12);
        for k in 0..3 {
            assert_eq!(loaded[k].as_slice(), original[k].as_slice());
        }
    }

    #[test]
    fn test_roundtrip_into_slot_containers() {
        let original = sample(2, 3);
        let mut buf = Vec::new();
        original.write_to(&mut buf).unwrap();

        let mut loaded: Metapopulation<SlotPopulation> = Metapopulation::new(2, 3);
        loaded.read_from(Cursor::new(buf), 6).unwrap();
        assert_eq!(loaded.total_alive(), 6);
        let subpops: Vec<usize> = loaded[1].alive().map(|i| i.subpopulation).collect();
        assert_eq!(subpops, vec![1, 1, 1]);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pop.tsv");
        sample(2, 4).write_to_file(&path).unwrap();
        sample(1, 1).write_to_file(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    fn load(
        text: &str,
        nsp: usize,
        cap: usize,
        expected: usize,
    ) -> Result<usize, PopulationFileError> {
        let mut mp: Metapopulation<SubPopulation> = Metapopulation::new(nsp, cap);
        mp.read_from(Cursor::new(text.as_bytes()), expected)
    }

    fn line(subpop: usize, alive: u8) -> String {
        let mut ind = Individual::from_gamete(Gamete::default(), subpop);
        ind.alive = alive == 1;
        format!("{ind}\n")
    }

    fn with_header(lines: &[String]) -> String {
        format!("{}\n{}", Individual::column_heads(), lines.concat())
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            load("", 1, 1, 0),
            Err(PopulationFileError::MissingHeader)
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let mut mp: Metapopulation = Metapopulation::new(1, 1);
        let err = mp.read_from_file(dir.path().join("absent.tsv"), 1).unwrap_err();
        assert!(matches!(err, PopulationFileError::Io(_)));
    }

    #[test]
    fn test_invalid_subpopulation() {
        let text = with_header(&[line(0, 1), line(2, 1)]);
        assert!(matches!(
            load(&text, 2, 4, 2),
            Err(PopulationFileError::InvalidSubpopulation { line: 3, id: 2, count: 2 })
        ));
    }

    #[test]
    fn test_subpopulation_full() {
        let text = with_header(&[line(0, 1), line(0, 1), line(0, 1)]);
        assert!(matches!(
            load(&text, 1, 2, 3),
            Err(PopulationFileError::SubpopulationFull { line: 4, id: 0 })
        ));
    }

    #[test]
    fn test_count_mismatch() {
        let text = with_header(&[line(0, 1), line(1, 1)]);
        assert!(matches!(
            load(&text, 2, 2, 4),
            Err(PopulationFileError::CountMismatch { expected: 4, found: 2 })
        ));
    }

    #[test]
    fn test_dead_individuals_are_skipped() {
        let text = with_header(&[line(0, 0), line(0, 1), line(1, 0), line(1, 1)]);
        let mut mp: Metapopulation = Metapopulation::new(2, 1);
        assert_eq!(mp.read_from(Cursor::new(text.as_bytes()), 2).unwrap(), 2);
        assert!(mp.iter().all(|sp| sp.len() == 1 && sp[0].is_alive()));
    }

    #[test]
    fn test_dead_individual_with_invalid_subpopulation() {
        let text = with_header(&[line(0, 1), line(7, 0)]);
        assert!(matches!(
            load(&text, 1, 1, 1),
            Err(PopulationFileError::InvalidSubpopulation { line: 3, id: 7, count: 1 })
        ));
    }

    #[test]
    fn test_dead_individual_in_full_subpopulation() {
        let text = with_header(&[line(0, 1), line(0, 0)]);
        assert!(matches!(
            load(&text, 1, 1, 1),
            Err(PopulationFileError::SubpopulationFull { line: 3, id: 0 })
        ));
    }

    #[test]
    fn test_malformed_field() {
        let text = with_header(&[line(0, 1).replacen("0", "x", 1)]);
        match load(&text, 1, 1, 1) {
            Err(PopulationFileError::Malformed { line, field, value }) => {
                assert_eq!(line, 2);
                assert_eq!(field, "Mat1");
                assert_eq!(value, "x");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_wrong_field_count() {
        let text = with_header(&["1\t2\t3\n".to_string()]);
        assert!(matches!(
            load(&text, 1, 1, 1),
            Err(PopulationFileError::WrongFieldCount { line: 2, found: 3, expected: 24 })
        ));
    }
}
