use clap::Parser;
use record_codec::core::codec::encode_with;
use record_codec::core::showcase::ScenarioOutput;
use record_codec::core::ConfigProvider;
use record_codec::domain::entity::ManagedObjectModel;
use record_codec::domain::ports::RecordStore;
use record_codec::utils::{logger, validation::Validate};
use record_codec::{
    decode, decode_managed, open_store, CliConfig, Person, PersistenceContext, RecordError,
    Settings, Showcase, TomlConfig,
};

fn main() {
    let cli = CliConfig::parse();

    let file_config = match cli.config.as_deref().map(TomlConfig::from_file).transpose() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file: {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    let log_level = file_config.as_ref().and_then(TomlConfig::log_level);
    if cli.json_logs {
        logger::init_json_logger(log_level);
    } else {
        logger::init_cli_logger(cli.verbose, log_level);
    }

    tracing::info!("Starting record-codec");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli, file_config.as_ref()) {
        tracing::error!(
            "❌ record-codec failed: {} (Severity: {:?})",
            e,
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &CliConfig, file_config: Option<&TomlConfig>) -> Result<(), RecordError> {
    if let Some(file) = file_config {
        file.validate()?;
    }
    let settings = Settings::resolve(cli, file_config);
    settings.validate()?;

    let store = open_store(&settings.store_location());
    let mut context = PersistenceContext::new(ManagedObjectModel::person(), store);

    match &cli.decode {
        Some(text) if cli.managed => decode_and_save(text, &mut context, &settings),
        Some(text) => {
            let person: Person = decode(text)?;
            tracing::info!("Decoded {:?}", person);
            println!("name: {}", person.name);
            println!("age: {}", person.age);
            Ok(())
        }
        None => run_showcase(&mut context, &settings),
    }
}

fn decode_and_save<S: RecordStore>(
    text: &str,
    context: &mut PersistenceContext<S>,
    settings: &Settings,
) -> Result<(), RecordError> {
    let record = decode_managed(text, context)?;
    let rows = context.save()?;
    let person = record.to_person(context)?;

    println!("name: {}", person.name);
    println!("age: {}", person.age);
    println!("saved rows: {}", rows);
    println!("{}", encode_with(&person, settings.pretty_output())?);
    Ok(())
}

fn run_showcase<S: RecordStore>(
    context: &mut PersistenceContext<S>,
    settings: &Settings,
) -> Result<(), RecordError> {
    let sample = Person::new(settings.person_name(), settings.person_age());
    let outcomes = Showcase::new(context, sample)
        .pretty(settings.pretty_output())
        .run();

    let mut first_error = None;
    for outcome in outcomes {
        let label = format!("{} {}", outcome.scenario, outcome.representation);
        match outcome.result {
            Ok(ScenarioOutput::Encoded(json)) => println!("{} json: {}", label, json),
            Ok(ScenarioOutput::Decoded(person)) => {
                println!("{} name: {}", label, person.name);
                println!("{} age: {}", label, person.age);
            }
            Ok(ScenarioOutput::Saved { person, rows }) => {
                println!("{} name: {}", label, person.name);
                println!("{} age: {}", label, person.age);
                println!("{} saved rows: {}", label, rows);
            }
            Err(e) => {
                eprintln!("{} error: {}", label, e.user_friendly_message());
                first_error.get_or_insert(e);
            }
        }
        println!();
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
