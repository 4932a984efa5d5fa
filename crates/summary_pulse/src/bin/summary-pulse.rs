use std::path::PathBuf;

use clap::Parser;
use summary_pulse::{
    gemini::GeminiClient,
    server,
    tracing::init_tracing_subscriber,
    yt::{YtDlpAudio, YtDlpSource},
    SummaryProcessorBuilder, WhisperConfig, WhisperCpp,
};

#[derive(Parser)]
#[command(name = "summary-pulse", about = "Content summarization server")]
struct Cli {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY")]
    gemini_key: String,

    /// Path to yt-dlp cookies file
    #[arg(long, env = "YTDLP_COOKIES_PATH")]
    cookies_path: Option<PathBuf>,

    /// whisper.cpp binary
    #[arg(long, env = "WHISPER_BIN", default_value = "whisper-cli")]
    whisper_bin: PathBuf,

    /// whisper.cpp model file
    #[arg(long, env = "WHISPER_MODEL_PATH")]
    whisper_model: PathBuf,

    /// ffmpeg binary used for audio resampling
    #[arg(long, env = "FFMPEG_PATH", default_value = "ffmpeg")]
    ffmpeg_bin: PathBuf,

    /// Forced speech-recognition language
    #[arg(long, env = "WHISPER_LANGUAGE", default_value = "ko")]
    language: String,

    /// Scratch directory for downloaded audio
    #[arg(long, default_value = "/var/tmp/summary-pulse")]
    scratch_dir: PathBuf,

    /// Address to bind the HTTP server on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    bind_addr: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let gemini = GeminiClient::new(reqwest::Client::new(), &cli.gemini_key);
    let whisper = WhisperCpp::new(WhisperConfig {
        whisper_bin: cli.whisper_bin,
        model_path: cli.whisper_model,
        ffmpeg_bin: cli.ffmpeg_bin,
        language: cli.language,
    });

    let processor = SummaryProcessorBuilder::new(&cli.scratch_dir)
        .video_source(YtDlpSource::new(cli.cookies_path.clone()))
        .audio_fetcher(YtDlpAudio::new(cli.cookies_path))
        .transcriber(whisper)
        .summarizer(gemini)
        .build();

    let app = server::router(processor);
    let listener = tokio::net::TcpListener::bind(&cli.bind_addr).await?;
    tracing::info!(addr = %cli.bind_addr, "Starting HTTP server");
    axum::serve(listener, app).await?;

    Ok(())
}
