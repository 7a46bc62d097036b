//! 語彙ブロックのビルドモジュール
//!
//! このモジュールは、語彙ソースファイル(lex.csv)と品詞定義ファイルから
//! バイナリ形式の語彙ブロックを構築する機能を提供します。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use legato::{CsvLexicon, LexiconIndex, PosTable};

/// ビルドコマンドの引数
///
/// 語彙ブロックをビルドするために必要な入力ファイルと出力先を指定します。
#[derive(Parser, Debug)]
#[clap(name = "build", about = "A program to build the lexicon block.")]
pub struct Args {
    /// Lexicon file (lex.csv).
    #[clap(short = 'l', long)]
    lexicon_in: PathBuf,

    /// Part-of-speech definition file with one six-column row per id.
    #[clap(short = 'p', long)]
    pos_in: PathBuf,

    /// File to which the binary lexicon block is output.
    #[clap(short = 'o', long)]
    output: PathBuf,

    /// Number of left connection ids accepted by the connection matrix.
    #[clap(long)]
    max_left: Option<i16>,

    /// Number of right connection ids accepted by the connection matrix.
    #[clap(long)]
    max_right: Option<i16>,
}

/// ビルド処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 語彙コンパイルエラー
    #[error(transparent)]
    Legato(#[from] legato::errors::LegatoError),
}

/// ビルドコマンドを実行する
///
/// 品詞定義と語彙ソースを読み込み、取り込み済みエントリから逆引き索引を
/// 構築した上で、バイナリブロックを出力ファイルへ書き出します。
///
/// # 引数
///
/// * `args` - コマンドライン引数
///
/// # エラー
///
/// ファイルの読み書きまたは語彙のコンパイルに失敗した場合、
/// `BuildError`を返します。
pub fn run(args: Args) -> Result<(), BuildError> {
    println!("Reading the part-of-speech table...");
    let pos_table = PosTable::from_reader(File::open(&args.pos_in)?)?;

    println!("Compiling the lexicon...");
    let mut lexicon = CsvLexicon::new(&pos_table);
    lexicon.load(File::open(&args.lexicon_in)?)?;
    if args.max_left.is_some() || args.max_right.is_some() {
        lexicon.set_limits(
            args.max_left.unwrap_or(i16::MAX),
            args.max_right.unwrap_or(i16::MAX),
        );
    }

    println!("Writing the lexicon block...");
    let index = LexiconIndex::from_entries(lexicon.entries());
    let mut wtr = BufWriter::new(File::create(&args.output)?);
    lexicon.write_to(&index, &mut wtr)?;
    wtr.flush()?;

    println!(
        "Successfully built the lexicon block to {}",
        args.output.display()
    );
    Ok(())
}
