//! Command line tool to fine-tune question answering models

use anyhow::anyhow;
use burn::backend::{libtorch::LibTorchDevice, Autodiff, LibTorch};
use burn_qa::{
    cli::{
        datasets::Dataset,
        models::{model::ModelError, Model},
        pipelines::Pipeline,
    },
    datasets::{quora, LoadableDataset},
    models::bert,
    pipelines::question_answering::{self, driver, span::LabelStrategy, Training},
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: train [PIPELINE] [DATASET] [OPTIONS]

Arguments:
  PIPELINE             The pipeline to use (defaults to 'question-answering')
  DATASET              The dataset to use (defaults to 'quora')

Options:
  -h, --help           Print help
  -m, --model          A model to fine-tune, may be repeated (defaults to all supported models)
  -n, --num-epochs     Number of epochs to train for
  -b, --batch-size     Batch size
  -d, --data-dir       The path to the top-level data directory (defaults to 'data')
  -c, --config         A YAML or JSON training config file, overridden by the options above
  --labels             How answer spans become targets: 'tokens' (default) or 'characters'
  --no-normalize       Skip stopword removal and stemming
  --cpu                Train on the CPU instead of the first CUDA device
";

#[derive(Debug)]
struct Args {
    pipeline: Option<String>,
    dataset: Option<String>,
    models: Vec<String>,
    num_epochs: Option<usize>,
    batch_size: Option<usize>,
    data_dir: Option<String>,
    config: Option<String>,
    labels: Option<String>,
    normalize: bool,
    cpu: bool,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            models: pargs.values_from_str(["-m", "--model"])?,
            num_epochs: pargs.opt_value_from_str(["-n", "--num-epochs"])?,
            batch_size: pargs.opt_value_from_str(["-b", "--batch-size"])?,
            data_dir: pargs.opt_value_from_str(["-d", "--data-dir"])?,
            config: pargs.opt_value_from_str(["-c", "--config"])?,
            labels: pargs.opt_value_from_str("--labels")?,
            normalize: !pargs.contains("--no-normalize"),
            cpu: pargs.contains("--cpu"),
            pipeline: pargs.opt_free_from_str()?,
            dataset: pargs.opt_free_from_str()?,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            return Err(anyhow!("Unexpected arguments: {:?}", remaining));
        }

        Ok(Some(args))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let pipeline = Pipeline::try_from(
        args.pipeline
            .as_deref()
            .unwrap_or(question_answering::PIPELINE),
    )?;

    let dataset = Dataset::try_from(args.dataset.as_deref().unwrap_or(quora::DATASET))?;

    let mut config = match &args.config {
        Some(path) => Training::from_file(path)?,
        None => Training::new(),
    };

    if !args.models.is_empty() {
        config.model_names = args.models.clone();
    } else if config.model_names.is_empty() {
        config.model_names = pipeline
            .default_models()
            .iter()
            .map(ToString::to_string)
            .collect();
    }

    if let Some(num_epochs) = args.num_epochs {
        config.num_epochs = num_epochs;
    }

    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }

    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.to_string();
    }

    if let Some(labels) = &args.labels {
        config.label_strategy = LabelStrategy::try_from(labels.as_str())?;
    }

    if !args.normalize {
        config.normalize = false;
    }

    config.dataset_name = dataset.to_string();

    // Every selected model must exist and fit the pipeline before any training starts
    for name in &config.model_names {
        let model = Model::try_from(name.as_str())?;

        if !model.is_supported(&pipeline) {
            return Err(ModelError::Unsupported(model.to_string(), pipeline.to_string()).into());
        }
    }

    let device = if args.cpu {
        LibTorchDevice::Cpu
    } else {
        LibTorchDevice::Cuda(0)
    };

    match pipeline {
        Pipeline::QuestionAnswering => handle_question_answering(&dataset, &config, device).await,
    }
}

async fn handle_question_answering(
    dataset: &Dataset,
    config: &Training,
    device: LibTorchDevice,
) -> anyhow::Result<()> {
    match dataset {
        Dataset::Quora => {
            let records = quora::Dataset::load(&config.data_dir).await?;
            let (train, test) = driver::prepare(records, config);

            let results = question_answering::run::<
                Autodiff<LibTorch>,
                bert::question_answering::Model<Autodiff<LibTorch>>,
                quora::Item,
                quora::Dataset,
            >(vec![device], train, test, config)
            .await?;

            for (model_name, evaluation) in results {
                println!(
                    "\n=== {model_name} ===\
                     \n- F1: {:.4}\
                     \n- Exact match: {:.4}\
                     \n- BLEU: {:.4}\
                     \n- ROUGE-1: {:.4}\
                     \n- ROUGE-2: {:.4}\
                     \n- ROUGE-L: {:.4}\
                     \n- Examples: {}\
                     \n================",
                    evaluation.scores.f1,
                    evaluation.scores.exact_match,
                    evaluation.scores.bleu,
                    evaluation.scores.rouge.rouge1,
                    evaluation.scores.rouge.rouge2,
                    evaluation.scores.rouge.rouge_l,
                    evaluation.samples,
                );
            }
        }
    }

    Ok(())
}
