use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

type Result<T> = std::result::Result<T, SnapshotError>;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot for platform `{0}` not found")]
    NotFound(String),
    #[error("failed to access snapshot storage")]
    Io(#[from] io::Error),
    #[error("failed to serialize snapshot")]
    Serialize(#[from] serde_json::Error),
}

/// プラットフォームごとのスナップショットファイルを管理するストア
///
/// スナップショットは`<dir>/<platform>_contests.json`に保存され、実行のたびに全体が上書きされる。
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        Ok(SnapshotStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn available(&self) -> bool {
        self.dir.is_dir()
    }

    pub fn path(&self, platform: &str) -> PathBuf {
        self.dir.join(format!("{}_contests.json", platform))
    }

    /// スナップショットを丸ごと書き換えるメソッド
    ///
    /// 出力はインデント4のpretty-printed JSONで、非ASCII文字は`\uXXXX`形式にエスケープされる。
    pub fn write<T>(&self, platform: &str, records: &[T]) -> Result<()>
    where
        T: Serialize,
    {
        let mut buf = Vec::with_capacity(4096);
        let mut serializer = Serializer::with_formatter(&mut buf, AsciiPrettyFormatter::new());
        records.serialize(&mut serializer)?;

        fs::write(self.path(platform), &buf)?;

        Ok(())
    }

    /// スナップショットの中身をそのまま返すメソッド
    pub fn read_raw(&self, platform: &str) -> Result<String> {
        match fs::read_to_string(self.path(platform)) {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(SnapshotError::NotFound(String::from(platform)))
            }
            Err(e) => Err(SnapshotError::Io(e)),
        }
    }
}

/// 非ASCII文字を`\uXXXX`にエスケープするpretty-printer
///
/// BMP外の文字はサロゲートペアとして出力される。
pub struct AsciiPrettyFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl<'a> AsciiPrettyFormatter<'a> {
    pub fn new() -> Self {
        AsciiPrettyFormatter {
            inner: PrettyFormatter::with_indent(b"    "),
        }
    }
}

impl<'a> Default for AsciiPrettyFormatter<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Formatter for AsciiPrettyFormatter<'a> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if c.is_ascii() {
                continue;
            }
            if start < i {
                writer.write_all(fragment[start..i].as_bytes())?;
            }
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())?;

        Ok(())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_object_value(writer)
    }
}
