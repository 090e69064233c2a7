use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Configure(args) => commands::configure::handle(&args, ctx, flags).await,
        Commands::Login => commands::session::handle_login(ctx, flags).await,
        Commands::Logout => commands::session::handle_logout(ctx, flags),
        Commands::Status => commands::session::handle_status(ctx, flags).await,
        Commands::Search(args) => commands::search::handle_search(&args, ctx, flags).await,
        Commands::Job(args) => commands::search::handle_job(&args, ctx, flags).await,
        Commands::Resolve(args) => commands::search::handle_resolve(&args, ctx, flags).await,
        Commands::InternalId(args) => commands::search::handle_internal_id(&args, ctx, flags).await,
        Commands::Export(args) => commands::export::handle(&args, ctx, flags).await,
        Commands::Project { action } => commands::project::handle(&action, ctx, flags).await,
        Commands::Files { action } => commands::files::handle(&action, ctx, flags).await,
        Commands::Settings(args) => commands::settings::handle(&args, ctx, flags),
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
