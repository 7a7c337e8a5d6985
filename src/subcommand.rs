use {super::*, settings::Settings};

pub mod block;
pub mod job;

#[derive(Debug, Parser)]
pub(crate) enum Subcommand {
    #[command(about = "Build a template and show its mining job")]
    Job(job::Job),
    #[command(about = "Assemble blocks from solutions to a template")]
    Block(block::Block),
}

impl Subcommand {
    pub(crate) fn run(self, settings: &Settings) -> Result {
        match self {
            Self::Job(job) => job.run(settings),
            Self::Block(block) => block.run(settings),
        }
    }
}

fn read_template(path: &Path) -> Result<RawTemplate> {
    let json = if path == Path::new("-") {
        let mut json = String::new();
        io::stdin()
            .read_to_string(&mut json)
            .context("failed to read block template from stdin")?;
        json
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read block template `{}`", path.display()))?
    };

    Ok(RawTemplate::from_json(&json)?)
}

/// Builds the template at `path` and publishes it as the live job.
fn publish_template(settings: &Settings, path: &Path) -> Result<Arc<Template>> {
    let raw = read_template(path)?;
    let config = settings.pool_config()?;
    let mut jobs = Jobs::new();

    let template = Template::build(
        jobs.next_id(),
        raw,
        &config,
        &Collaborators::for_pool(&config),
    )
    .with_context(|| format!("failed to build template from `{}`", path.display()))?;

    let template = Arc::new(template);
    jobs.publish(template.clone());

    Ok(template)
}

fn print_json(output: &impl Serialize) -> Result {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}
