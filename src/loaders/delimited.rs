use super::Loader;
use crate::model::{Assignments, Period, Student, StudentId};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use eyre::{OptionExt, WrapErr, bail, ensure, eyre};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Header names of the columns used by the allocation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Columns {
    /// Student identifier, the first column when not set.
    pub id: Option<String>,
    pub profession: String,
    pub source_group: String,
    pub stage: String,
    pub period: String,
    pub output: String,
}

impl Default for Columns {
    fn default() -> Columns {
        Columns {
            id: None,
            profession: "Metier".to_owned(),
            source_group: "GROUPE".to_owned(),
            stage: "Stage M1 hors Ile de France".to_owned(),
            period: "Periode".to_owned(),
            output: "NOUVEAU GROUPE".to_owned(),
        }
    }
}

/// Parsed file kept around so that it can be written back unchanged
/// except for the output column.
#[derive(Debug)]
struct Table {
    headers: StringRecord,
    records: Vec<StringRecord>,
    /// Physical 1-based line of each record.
    lines: Vec<usize>,
    output: usize,
    crlf: bool,
}

/// Offsets at which each physical line of the raw input starts.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(raw: &[u8]) -> LineIndex {
        let starts = std::iter::once(0)
            .chain(
                raw.iter()
                    .enumerate()
                    .filter_map(|(i, &b)| (b == b'\n').then_some(i + 1)),
            )
            .collect();
        LineIndex { starts }
    }

    /// Line of the first byte at or after `byte` that is not a line
    /// terminator. A record position may point at the end of the previous
    /// line or at skipped blank lines.
    fn line_at(&self, raw: &[u8], byte: usize) -> usize {
        let byte = byte.min(raw.len());
        let start = raw[byte..]
            .iter()
            .position(|&b| b != b'\r' && b != b'\n')
            .map_or(raw.len(), |n| byte + n);
        self.starts.partition_point(|&s| s <= start)
    }
}

#[derive(Debug)]
struct Positions {
    id: usize,
    profession: usize,
    source_group: usize,
    stage: usize,
    period: usize,
}

/// Reads students from a delimited text file with a header line, and
/// writes the destination groups back into the same file.
pub struct DelimitedLoader {
    path: PathBuf,
    delimiter: u8,
    quoting: bool,
    columns: Columns,
    table: Option<Table>,
}

impl DelimitedLoader {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8, quoting: bool, columns: Columns) -> Self {
        DelimitedLoader {
            path: path.into(),
            delimiter,
            quoting,
            columns,
            table: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table<R: Read>(&self, mut reader: R) -> eyre::Result<Table> {
        let mut raw = Vec::new();
        reader
            .read_to_end(&mut raw)
            .wrap_err("cannot read input")?;
        let header_end = raw.iter().position(|&b| b == b'\n').unwrap_or(raw.len());
        let crlf = header_end > 0 && raw[header_end - 1] == b'\r';
        let index = LineIndex::new(&raw);
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .quoting(self.quoting)
            .flexible(true)
            .from_reader(raw.as_slice());
        let headers = reader.headers().wrap_err("cannot read header line")?.clone();
        let output = find_column(&headers, &self.columns.output)?;
        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("cannot read records")?;
        let lines = records
            .iter()
            .map(|r| {
                let byte = r.position().map_or(raw.len(), |p| p.byte() as usize);
                index.line_at(&raw, byte)
            })
            .collect();
        Ok(Table {
            headers,
            records,
            lines,
            output,
            crlf,
        })
    }

    fn positions(&self, headers: &StringRecord) -> eyre::Result<Positions> {
        Ok(Positions {
            id: match &self.columns.id {
                Some(name) => find_column(headers, name)?,
                None => 0,
            },
            profession: find_column(headers, &self.columns.profession)?,
            source_group: find_column(headers, &self.columns.source_group)?,
            stage: find_column(headers, &self.columns.stage)?,
            period: find_column(headers, &self.columns.period)?,
        })
    }

    fn parse<R: Read>(&mut self, reader: R) -> eyre::Result<Vec<Student>> {
        let table = self.read_table(reader)?;
        let positions = self.positions(&table.headers)?;
        let students = table
            .records
            .iter()
            .zip(&table.lines)
            .enumerate()
            .map(|(idx, (record, &line))| {
                parse_student(StudentId(idx), line, record, &positions)
            })
            .collect::<eyre::Result<Vec<_>>>()?;
        self.table = Some(table);
        Ok(students)
    }

    fn write<W: Write>(&self, writer: W, assignments: &Assignments) -> eyre::Result<()> {
        let table = self
            .table
            .as_ref()
            .ok_or_eyre("no data loaded, nothing to save")?;
        ensure!(
            table.records.len() == assignments.students.len(),
            "{} records loaded but {} students assigned",
            table.records.len(),
            assignments.students.len()
        );
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(if self.quoting {
                QuoteStyle::Necessary
            } else {
                QuoteStyle::Never
            })
            .terminator(if table.crlf {
                Terminator::CRLF
            } else {
                Terminator::Any(b'\n')
            })
            .flexible(true)
            .from_writer(writer);
        writer.write_record(&table.headers)?;
        for (record, (_, number)) in table.records.iter().zip(assignments.mapping()) {
            let number = number.map(|n| n.to_string()).unwrap_or_default();
            let width = record.len().max(table.output + 1);
            let fields = (0..width).map(|i| {
                if i == table.output {
                    number.as_str()
                } else {
                    record.get(i).unwrap_or("")
                }
            });
            writer.write_record(fields)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Loader for DelimitedLoader {
    fn load(&mut self) -> eyre::Result<Vec<Student>> {
        let file = File::open(&self.path)
            .wrap_err_with(|| format!("cannot open {}", self.path.display()))?;
        let students = self
            .parse(file)
            .wrap_err_with(|| format!("cannot load students from {}", self.path.display()))?;
        info!(
            path = %self.path.display(),
            students = students.len(),
            "Students loaded"
        );
        Ok(students)
    }

    fn save(&mut self, assignments: &Assignments) -> eyre::Result<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let file = File::create(&tmp)
            .wrap_err_with(|| format!("cannot create {}", tmp.display()))?;
        if let Err(e) = self.write(file, assignments) {
            let _ = fs::remove_file(&tmp);
            return Err(e.wrap_err(format!("cannot write {}", tmp.display())));
        }
        fs::rename(&tmp, &self.path)
            .wrap_err_with(|| format!("cannot replace {}", self.path.display()))?;
        debug!(path = %self.path.display(), "Assignments saved");
        Ok(())
    }
}

/// Lowercase and strip accents so that `Période` matches `Periode`.
fn normalize_header(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' | 'À' | 'Â' | 'Ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
            'î' | 'ï' | 'Î' | 'Ï' => 'i',
            'ô' | 'ö' | 'Ô' | 'Ö' => 'o',
            'ù' | 'û' | 'ü' | 'Ù' | 'Û' | 'Ü' => 'u',
            'ç' | 'Ç' => 'c',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

fn find_column(headers: &StringRecord, name: &str) -> eyre::Result<usize> {
    let name = normalize_header(name);
    headers
        .iter()
        .position(|h| normalize_header(h) == name)
        .ok_or_else(|| eyre!("column {name:?} not found in header"))
}

fn parse_source_group(cell: &str) -> eyre::Result<u32> {
    let digits = cell.trim().trim_start_matches(|c: char| !c.is_ascii_digit());
    if digits.is_empty() {
        bail!("no group number in {cell:?}");
    }
    digits
        .parse()
        .wrap_err_with(|| format!("invalid group number {cell:?}"))
}

fn parse_student(
    id: StudentId,
    line: usize,
    record: &StringRecord,
    at: &Positions,
) -> eyre::Result<Student> {
    let cell = |idx: usize, what: &str| {
        record
            .get(idx)
            .map(str::trim)
            .ok_or_else(|| eyre!("line {line}: missing {what} column"))
    };
    let label = cell(at.id, "identifier")?;
    ensure!(!label.is_empty(), "line {line}: empty identifier");
    let source_group = parse_source_group(cell(at.source_group, "source group")?)
        .wrap_err(format!("line {line}"))?;
    let period = cell(at.period, "period")?
        .parse::<Period>()
        .wrap_err(format!("line {line}"))?;
    let stage_far = cell(at.stage, "stage")?.eq_ignore_ascii_case("oui");
    Ok(Student::new(
        id,
        label.to_owned(),
        line,
        source_group,
        cell(at.profession, "profession")?.to_owned(),
        period,
        stage_far,
    ))
}
