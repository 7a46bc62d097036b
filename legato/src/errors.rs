//! エラー型の定義
//!
//! このモジュールは、Legatoライブラリで使用されるすべてのエラー型を定義します。

use std::error::Error;
use std::fmt;

/// Legato専用のResult型
///
/// エラー型としてデフォルトで[`LegatoError`]を使用します。
pub type Result<T, E = LegatoError> = std::result::Result<T, E>;

/// Legatoのエラー型
///
/// このライブラリで発生する可能性のあるすべてのエラーを表現します。
/// 各バリアントは特定のエラー条件に対応しています。
#[derive(Debug, thiserror::Error)]
pub enum LegatoError {
    /// 行の形状が不正な場合のエラー
    ///
    /// [`StructuralError`]のエラーバリアント。
    #[error(transparent)]
    Structural(StructuralError),

    /// フィールドの値が制約に違反した場合のエラー
    ///
    /// [`ValidationError`]のエラーバリアント。
    #[error(transparent)]
    Validation(ValidationError),

    /// 参照を解決できない場合のエラー
    ///
    /// [`ReferenceError`]のエラーバリアント。
    #[error(transparent)]
    Reference(ReferenceError),

    /// エスケープシーケンスが不正な場合のエラー
    ///
    /// [`FormatError`]のエラーバリアント。
    #[error(transparent)]
    Format(FormatError),

    /// 整数パースエラー
    ///
    /// [`ParseIntError`](std::num::ParseIntError)のエラーバリアント。
    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),

    /// 整数変換エラー
    ///
    /// [`TryFromIntError`](std::num::TryFromIntError)のエラーバリアント。
    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// UTF-8エンコーディングエラー
    ///
    /// [`std::str::Utf8Error`]のエラーバリアント。
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    /// 標準I/Oエラー
    ///
    /// [`std::io::Error`]のエラーバリアント。
    #[error(transparent)]
    StdIo(#[from] std::io::Error),
}

impl LegatoError {
    /// 行形状エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    pub(crate) fn structural<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::Structural(StructuralError { msg: msg.into() })
    }

    /// 値検証エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    pub(crate) fn validation<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::Validation(ValidationError { msg: msg.into() })
    }

    /// 参照解決エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    pub(crate) fn reference<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::Reference(ReferenceError { msg: msg.into() })
    }

    /// エスケープシーケンスエラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    pub(crate) fn escape<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::Format(FormatError { msg: msg.into() })
    }
}

/// 行の列数や形状が不正な場合に使用されるエラー
#[derive(Debug)]
pub struct StructuralError {
    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "StructuralError: {}", self.msg)
    }
}

impl Error for StructuralError {}

/// フィールドの値が制約に違反した場合に使用されるエラー
#[derive(Debug)]
pub struct ValidationError {
    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ValidationError: {}", self.msg)
    }
}

impl Error for ValidationError {}

/// 単語参照を解決できない場合に使用されるエラー
#[derive(Debug)]
pub struct ReferenceError {
    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ReferenceError: {}", self.msg)
    }
}

impl Error for ReferenceError {}

/// エスケープシーケンスが不正な場合に使用されるエラー
#[derive(Debug)]
pub struct FormatError {
    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FormatError: {}", self.msg)
    }
}

impl Error for FormatError {}
