//! CLI 명령어 구현 모듈.

pub mod admin;
pub mod clear;
pub mod db;
pub mod fixtures;
pub mod migrate;
pub mod seed;
