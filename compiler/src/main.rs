//! Legato 語彙コンパイラのメインエントリーポイント
//!
//! このモジュールは、CSV形式の語彙ソースからバイナリ辞書ブロックを
//! ビルドするためのCLIツールを提供します。

mod build;

use clap::Parser;
use thiserror::Error;

use crate::build::BuildError;

/// コマンドライン引数の構造体
///
/// `clap`を使用してコマンドライン引数をパースします。
#[derive(Parser, Debug)]
#[clap(name = "compile", version)]
struct Cli {
    /// 実行するサブコマンド
    #[clap(subcommand)]
    command: Command,
}

/// 利用可能なサブコマンド
#[derive(Parser, Debug)]
enum Command {
    /// ソースファイルからバイナリ語彙ブロックを構築します
    ///
    /// 語彙ソースファイル(lex.csv)と品詞定義から、オフセットテーブル付きの
    /// バイナリブロックを生成します。
    Build(build::Args),
}

/// コンパイラの実行中に発生する可能性のあるエラー
///
/// 各サブコマンドで発生したエラーをラップします。
#[derive(Debug, Error)]
pub enum CompileError {
    /// 語彙ブロックビルド中のエラー
    #[error(transparent)]
    BuildError(#[from] BuildError),
}

/// メイン関数
///
/// コマンドライン引数をパースし、指定されたサブコマンドを実行します。
///
/// # エラー
///
/// 各サブコマンドの実行中にエラーが発生した場合、そのエラーが返されます。
fn main() -> Result<(), CompileError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Build(args) => Ok(build::run(args)?),
    }
}
