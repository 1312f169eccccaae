//! A thin stdin/stdout driver: wires one memory boundary, one tracer, and
//! one model backend into an [`Orchestrator`], then runs turns either
//! one-shot (`--prompt`) or as a REPL reading stdin line by line.
//!
//! Flag parsing follows the pack's own composition-root style — manual
//! flag-by-flag matching, no argument-parsing crate — rather than
//! introducing a dependency this binary is the only consumer of.

use conduit_core::error::ModelError;
use conduit_core::model::{ModelBackend, ModelBackendResponse, ModelRequest};
use conduit_core::{ConversationId, MemoryBoundary, TraceId, Tracer};
use conduit_graph::{GraphConfig, Orchestrator};
use conduit_memory::{DisabledMemory, InMemoryMemory, PersistentMemory};
use conduit_provider::{HttpChatBackend, MockBackend};
use conduit_tool::{EchoTool, ToolRegistry, WebSearchTool};
use conduit_tracer::{NoopTracer, StructuredTracer};
use std::future::Future;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
struct CliError(String);

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Either canned or HTTP-backed generation, behind one concrete type so
/// `Orchestrator` stays generic over a single `ModelBackend` rather than
/// needing trait objects (the backend trait is RPITIT and not object-safe).
enum Backend {
    Mock(MockBackend),
    Http(HttpChatBackend),
}

impl ModelBackend for Backend {
    fn generate(
        &self,
        request: ModelRequest,
    ) -> impl Future<Output = Result<ModelBackendResponse, ModelError>> + Send {
        async move {
            match self {
                Backend::Mock(b) => b.generate(request).await,
                Backend::Http(b) => b.generate(request).await,
            }
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("conduit error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let mut backend_kind = "mock".to_string();
    let mut model = "llama3".to_string();
    let mut base_url = "http://localhost:11434".to_string();
    let mut memory_kind = "memory".to_string();
    let mut state_dir: Option<PathBuf> = None;
    let mut tracer_kind = "noop".to_string();
    let mut prompt: Option<String> = None;
    let mut conversation_id: Option<String> = None;

    while let Some(flag) = args.first().cloned() {
        args.remove(0);
        match flag.as_str() {
            "--backend" => backend_kind = take_arg("--backend", &mut args)?,
            "--model" => model = take_arg("--model", &mut args)?,
            "--base-url" => base_url = take_arg("--base-url", &mut args)?,
            "--memory" => memory_kind = take_arg("--memory", &mut args)?,
            "--state-dir" => state_dir = Some(PathBuf::from(take_arg("--state-dir", &mut args)?)),
            "--tracer" => tracer_kind = take_arg("--tracer", &mut args)?,
            "--prompt" => prompt = Some(take_arg("--prompt", &mut args)?),
            "--conversation-id" => conversation_id = Some(take_arg("--conversation-id", &mut args)?),
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => return Err(CliError(format!("unknown flag: {other}"))),
        }
    }

    let backend = match backend_kind.as_str() {
        "mock" => Backend::Mock(MockBackend::fixed(
            "This is a canned response from the mock backend.",
        )),
        "http" => Backend::Http(HttpChatBackend::new().model(model).base_url(base_url)),
        other => return Err(CliError(format!("unknown backend: {other}"))),
    };

    let memory: Arc<dyn MemoryBoundary> = match memory_kind.as_str() {
        "memory" => Arc::new(InMemoryMemory::new()),
        "disabled" => Arc::new(DisabledMemory),
        "persistent" => {
            let dir = state_dir
                .ok_or_else(|| CliError("--memory persistent requires --state-dir".to_string()))?;
            Arc::new(PersistentMemory::new(dir))
        }
        other => return Err(CliError(format!("unknown memory backend: {other}"))),
    };

    let tracer: Arc<dyn Tracer> = match tracer_kind.as_str() {
        "noop" => Arc::new(NoopTracer),
        "structured" => Arc::new(StructuredTracer::new()),
        other => return Err(CliError(format!("unknown tracer: {other}"))),
    };

    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(EchoTool));
    tools.register(Arc::new(WebSearchTool::new()));

    let orchestrator = Orchestrator::new(
        Arc::new(backend),
        memory,
        Arc::new(tools),
        tracer,
        GraphConfig::default(),
    );

    let conversation_id = conversation_id.map(ConversationId::new);

    if let Some(text) = prompt {
        let outcome = orchestrator
            .invoke(text, conversation_id, Some(TraceId::new(new_trace_id())))
            .await;
        println!("{}", outcome.output);
        return Ok(());
    }

    let conversation_id =
        conversation_id.unwrap_or_else(|| ConversationId::new(new_trace_id()));
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| CliError(format!("stdin read error: {e}")))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let outcome = orchestrator
            .invoke(
                trimmed.to_string(),
                Some(conversation_id.clone()),
                Some(TraceId::new(new_trace_id())),
            )
            .await;
        println!("{}", outcome.output);
    }

    Ok(())
}

fn new_trace_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn take_arg(flag: &str, remaining: &mut Vec<String>) -> Result<String, CliError> {
    if remaining.is_empty() {
        return Err(CliError(format!("{flag} requires a value")));
    }
    Ok(remaining.remove(0))
}

fn print_usage() {
    println!(
        "conduit — conversational agent runtime CLI\n\n\
         USAGE:\n    conduit [OPTIONS]\n\n\
         OPTIONS:\n\
         \x20   --backend <mock|http>       model backend (default: mock)\n\
         \x20   --model <name>              model name for --backend http\n\
         \x20   --base-url <url>            base URL for --backend http\n\
         \x20   --memory <memory|disabled|persistent>  memory boundary (default: memory)\n\
         \x20   --state-dir <path>          root directory for --memory persistent\n\
         \x20   --tracer <noop|structured>  tracer backend (default: noop)\n\
         \x20   --prompt <text>             run one turn and exit; otherwise reads stdin line by line\n\
         \x20   --conversation-id <id>      reuse a conversation id across turns\n"
    );
}
