//! LeadFlow 운영 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 마이그레이션 적용
//! leadflow migrate
//!
//! # 데모 데이터 생성 (이미 있으면 건너뜀)
//! leadflow seed
//! leadflow seed --force
//!
//! # 전체 데이터 삭제
//! leadflow clear --force
//!
//! # 관리자 계정 생성/승격
//! leadflow create-admin --name "Ops" --email ops@leadflow.com --password s3cret!
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use leadflow_cli::commands::{admin, clear, db, fixtures, migrate, seed};

#[derive(Parser)]
#[command(name = "leadflow")]
#[command(about = "LeadFlow CLI - 마이그레이션, 데모 데이터, 관리자 계정 관리", long_about = None)]
#[command(version)]
struct Cli {
    /// 데이터베이스 URL (기본: 설정 파일 또는 LEADFLOW__DATABASE__URL)
    #[arg(long, global = true)]
    db_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 내장된 SQL 마이그레이션 적용
    Migrate,

    /// 데모 데이터 생성
    Seed {
        /// 이미 시드된 DB도 지우고 다시 생성
        #[arg(short, long)]
        force: bool,
    },

    /// 모든 데이터 삭제
    Clear {
        /// 삭제 확인
        #[arg(short, long)]
        force: bool,
    },

    /// super_admin 계정 생성 또는 기존 계정 승격
    CreateAdmin {
        /// 표시 이름
        #[arg(long)]
        name: String,

        /// 이메일
        #[arg(long)]
        email: String,

        /// 비밀번호 (6자 이상)
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // 트레이싱 초기화
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let pool = db::connect(cli.db_url).await?;

    match cli.command {
        Commands::Migrate => {
            migrate::migrate(&pool).await?;
            println!("마이그레이션 완료");
        }

        Commands::Seed { force } => {
            migrate::migrate(&pool).await?;

            match seed::seed(&pool, force).await? {
                Some(summary) => {
                    println!("\n데모 데이터 생성 완료");
                    println!("  계정: {}", summary.accounts);
                    println!("  리드: {}", summary.leads);
                    println!("  채팅: {}", summary.messages);
                    println!("  통화: {}", summary.calls);
                    println!("\n로그인 정보:");
                    println!("  admin@leadflow.com / {}", fixtures::ADMIN_PASSWORD);
                    println!("  user@leadflow.com / {}", fixtures::USER_PASSWORD);
                }
                None => {
                    info!("Database already seeded, skipping");
                    println!("이미 시드된 데이터베이스입니다. 다시 생성하려면 --force를 사용하세요.");
                }
            }
        }

        Commands::Clear { force } => {
            clear::clear(&pool, force).await?;
            println!("모든 데이터가 삭제되었습니다.");
        }

        Commands::CreateAdmin {
            name,
            email,
            password,
        } => {
            let account = admin::create_admin(&pool, &name, &email, &password).await?;
            println!("관리자 계정 준비 완료: {} ({})", account.email, account.id);
        }
    }

    pool.close().await;
    Ok(())
}
