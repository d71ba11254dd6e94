//! Counted record files.
//!
//! A record file starts with a little-endian `u32` record count followed by
//! that many records, each prefixed with the kind of OSM element it came from
//! and that element's id:
//!
//! ```text
//! count:u32 { kind:u8 id:u64 record }*
//! ```

use std::io::{BufReader, BufWriter, Read, Seek, Write};

use camino::Utf8Path;
use cap_std::fs_utf8::File;
use cartopack_core::codec::{read_area, read_way, write_area, write_way};
use cartopack_core::{
    Area, CodecError, CodecMode, DataScanner, DataWriter, FeatureKind, TypeConfig, Way,
};

use crate::optimize::OptimizeError;

/// OSM element kind a record was derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SourceKind(pub u8);

impl SourceKind {
    /// No source element.
    pub const NONE: Self = Self(0);
    /// Derived from a node.
    pub const NODE: Self = Self(1);
    /// Derived from a way.
    pub const WAY: Self = Self(2);
    /// Derived from a relation.
    pub const RELATION: Self = Self(3);
}

/// Prefix stored before every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RecordHeader {
    /// Element kind the record came from.
    pub kind: SourceKind,
    /// Id of the source element.
    pub id: u64,
}

impl RecordHeader {
    /// Header for a record derived from element `id` of `kind`.
    #[must_use]
    pub const fn new(kind: SourceKind, id: u64) -> Self {
        Self { kind, id }
    }
}

/// A record type that can be stored in a record file.
pub trait Record: Sized {
    /// Type-id space the record's types come from.
    const KIND: FeatureKind;

    /// Decode one record.
    ///
    /// # Errors
    ///
    /// Propagates codec failures.
    fn read_from<R: Read>(
        scanner: &mut DataScanner<R>,
        types: &TypeConfig,
        mode: CodecMode,
    ) -> Result<Self, CodecError>;

    /// Encode one record.
    ///
    /// # Errors
    ///
    /// Propagates codec failures.
    fn write_to<W: Write>(
        &self,
        writer: &mut DataWriter<W>,
        types: &TypeConfig,
        mode: CodecMode,
    ) -> Result<(), CodecError>;
}

impl Record for Area {
    const KIND: FeatureKind = FeatureKind::Area;

    fn read_from<R: Read>(
        scanner: &mut DataScanner<R>,
        types: &TypeConfig,
        mode: CodecMode,
    ) -> Result<Self, CodecError> {
        read_area(scanner, types, mode)
    }

    fn write_to<W: Write>(
        &self,
        writer: &mut DataWriter<W>,
        types: &TypeConfig,
        mode: CodecMode,
    ) -> Result<(), CodecError> {
        write_area(writer, self, types, mode)
    }
}

impl Record for Way {
    const KIND: FeatureKind = FeatureKind::Way;

    fn read_from<R: Read>(
        scanner: &mut DataScanner<R>,
        types: &TypeConfig,
        mode: CodecMode,
    ) -> Result<Self, CodecError> {
        read_way(scanner, types, mode)
    }

    fn write_to<W: Write>(
        &self,
        writer: &mut DataWriter<W>,
        types: &TypeConfig,
        mode: CodecMode,
    ) -> Result<(), CodecError> {
        write_way(writer, self, types, mode)
    }
}

/// Sequential reader over a counted record file.
#[derive(Debug)]
pub struct RecordReader<R> {
    scanner: DataScanner<R>,
    total: u32,
    position: u32,
}

impl<R: Read> RecordReader<R> {
    /// Read the file header.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] when the count cannot be read.
    pub fn new(inner: R) -> Result<Self, CodecError> {
        let mut scanner = DataScanner::new(inner);
        let total = scanner.read_u32()?;
        Ok(Self {
            scanner,
            total,
            position: 0,
        })
    }

    /// Number of records announced by the header.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Number of records read so far.
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }

    /// Read the next record, or `None` once every announced record was read.
    ///
    /// # Errors
    ///
    /// Propagates codec failures; the reader must not be used afterwards.
    pub fn next_record<F: Record>(
        &mut self,
        types: &TypeConfig,
        mode: CodecMode,
    ) -> Result<Option<(RecordHeader, F)>, CodecError> {
        if self.position == self.total {
            return Ok(None);
        }
        let kind = SourceKind(self.scanner.read_u8()?);
        let id = self.scanner.read_u64()?;
        let record = F::read_from(&mut self.scanner, types, mode)?;
        self.position += 1;
        Ok(Some((RecordHeader { kind, id }, record)))
    }
}

/// Writer for a counted record file.
///
/// A placeholder count is written up front and patched by
/// [`RecordWriter::finish`].
#[derive(Debug)]
pub struct RecordWriter<W> {
    writer: DataWriter<W>,
    header_offset: u64,
    written: u32,
}

impl<W: Write + Seek> RecordWriter<W> {
    /// Reserve the header at the current stream position.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] when the placeholder cannot be written.
    pub fn new(inner: W) -> Result<Self, CodecError> {
        let mut writer = DataWriter::new(inner);
        let header_offset = writer.position()?;
        writer.write_u32(0)?;
        Ok(Self {
            writer,
            header_offset,
            written: 0,
        })
    }

    /// Append one record.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::CountOverflow`] past `u32::MAX` records and
    /// propagates codec failures.
    pub fn write_record<F: Record>(
        &mut self,
        header: RecordHeader,
        record: &F,
        types: &TypeConfig,
        mode: CodecMode,
    ) -> Result<(), CodecError> {
        let next = self
            .written
            .checked_add(1)
            .ok_or(CodecError::CountOverflow(u64::from(u32::MAX) + 1))?;
        self.writer.write_u8(header.kind.0)?;
        self.writer.write_u64(header.id)?;
        record.write_to(&mut self.writer, types, mode)?;
        self.written = next;
        Ok(())
    }

    /// Number of records written so far.
    #[must_use]
    pub const fn written(&self) -> u32 {
        self.written
    }

    /// Patch the header with the record count and flush.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] when seeking, writing or flushing fails.
    pub fn finish(mut self) -> Result<W, CodecError> {
        let end = self.writer.position()?;
        self.writer.seek_to(self.header_offset)?;
        self.writer.write_u32(self.written)?;
        self.writer.seek_to(end)?;
        self.writer.get_mut().flush()?;
        Ok(self.writer.into_inner())
    }
}

/// Buffered reader over a record file on disk.
pub type FileRecordReader = RecordReader<BufReader<File>>;

/// Buffered writer for a record file on disk.
pub type FileRecordWriter = RecordWriter<BufWriter<File>>;

/// Open `path` and read its header.
pub(crate) fn open_reader(path: &Utf8Path) -> Result<FileRecordReader, OptimizeError> {
    let file = cartopack_fs::open_input(path).map_err(|source| OptimizeError::Open {
        path: path.to_owned(),
        source,
    })?;
    RecordReader::new(BufReader::new(file)).map_err(|source| OptimizeError::Decode {
        path: path.to_owned(),
        record: 0,
        source,
    })
}

/// Create `path` and reserve its header.
pub(crate) fn create_writer(path: &Utf8Path) -> Result<FileRecordWriter, OptimizeError> {
    let file = cartopack_fs::create_output(path).map_err(|source| OptimizeError::Create {
        path: path.to_owned(),
        source,
    })?;
    RecordWriter::new(BufWriter::new(file)).map_err(|source| OptimizeError::Encode {
        path: path.to_owned(),
        record: 0,
        source,
    })
}

/// Patch the header, flush and sync a record file.
pub(crate) fn finish_writer(
    writer: FileRecordWriter,
    path: &Utf8Path,
) -> Result<(), OptimizeError> {
    let buffered = writer
        .finish()
        .map_err(|source| OptimizeError::PatchHeader {
            path: path.to_owned(),
            source,
        })?;
    let file = buffered.into_inner().map_err(|err| OptimizeError::Sync {
        path: path.to_owned(),
        source: err.into_error(),
    })?;
    file.sync_all().map_err(|source| OptimizeError::Sync {
        path: path.to_owned(),
        source,
    })
}

/// Write `records` to a new record file in import mode.
///
/// # Errors
///
/// Returns an [`OptimizeError`] naming `path` when creating, encoding or
/// finishing the file fails.
pub fn write_record_file<'a, F, I>(
    path: &Utf8Path,
    types: &TypeConfig,
    records: I,
) -> Result<u32, OptimizeError>
where
    F: Record + 'a,
    I: IntoIterator<Item = &'a (RecordHeader, F)>,
{
    let mut writer = create_writer(path)?;
    for (header, record) in records {
        writer
            .write_record(*header, record, types, CodecMode::Import)
            .map_err(|source| OptimizeError::Encode {
                path: path.to_owned(),
                record: writer.written() + 1,
                source,
            })?;
    }
    let written = writer.written();
    finish_writer(writer, path)?;
    Ok(written)
}

/// Read every record of a record file.
///
/// # Errors
///
/// Returns an [`OptimizeError`] naming `path` and the failing record.
pub fn read_record_file<F: Record>(
    path: &Utf8Path,
    types: &TypeConfig,
    mode: CodecMode,
) -> Result<Vec<(RecordHeader, F)>, OptimizeError> {
    let mut reader = open_reader(path)?;
    let mut records = Vec::new();
    loop {
        let next = reader
            .next_record(types, mode)
            .map_err(|source| OptimizeError::Decode {
                path: path.to_owned(),
                record: reader.position() + 1,
                source,
            })?;
        match next {
            Some(entry) => records.push(entry),
            None => return Ok(records),
        }
    }
}
