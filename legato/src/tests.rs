//! Legatoのテストモジュール群
//!
//! 語彙コンパイルの一連の動作(取り込み、参照解決、バイナリ書き出し)を
//! 検証するテストを含みます。
