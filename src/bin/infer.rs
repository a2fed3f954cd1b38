//! Command line tool to answer questions with a fine-tuned model

use anyhow::{anyhow, Result};
use burn::backend::{libtorch::LibTorchDevice, Autodiff, LibTorch};
use burn_qa::{
    cli::{models::Model, pipelines::Pipeline},
    models::bert,
    pipelines::question_answering,
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: infer [OPTIONS] QUESTION...

Arguments:
  QUESTION             One or more questions to extract answers from

Options:
  -h, --help           Print help
  -m, --model          The fine-tuned model to use (defaults to 'bert-base-uncased')
  -d, --data-dir       The path to the top-level data directory (defaults to 'data')
  --cpu                Run on the CPU instead of the first CUDA device
";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// The model to use
    model: Option<String>,

    /// The top-level data directory
    data_dir: Option<String>,

    /// Run on the CPU
    cpu: bool,

    /// The questions to answer
    questions: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut pargs = Arguments::from_env();

    let help = pargs.contains(["-h", "--help"]);
    let model = pargs.opt_value_from_str(["-m", "--model"])?;
    let data_dir = pargs.opt_value_from_str(["-d", "--data-dir"])?;
    let cpu = pargs.contains("--cpu");

    let questions = pargs
        .finish()
        .into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|arg| anyhow!("Question is not valid UTF-8: {:?}", arg))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Args {
        help,
        model,
        data_dir,
        cpu,
        questions,
    })
}

fn main() -> Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    let args = parse_args()?;

    if args.help || args.questions.is_empty() {
        println!("{}", HELP);
        return Ok(());
    }

    let pipeline = Pipeline::QuestionAnswering;

    let model = match &args.model {
        Some(model) => Model::try_from(model.as_str())?,
        None => pipeline.default_model(),
    };

    let data_dir = args.data_dir.as_deref().unwrap_or("data");

    let device = if args.cpu {
        LibTorchDevice::Cpu
    } else {
        LibTorchDevice::Cuda(0)
    };

    // Get model predictions
    let predictions = question_answering::infer::<
        Autodiff<LibTorch>,
        bert::question_answering::Model<Autodiff<LibTorch>>,
    >(device, data_dir, &model.to_string(), args.questions.clone())?;

    // Print out the extracted answer for each question
    for (i, (text, prediction)) in args.questions.iter().zip(predictions).enumerate() {
        let answer = if prediction.answer.is_empty() {
            "(no answer)"
        } else {
            prediction.answer.as_str()
        };

        println!(
            "\n=== Item {i} ===\
             \n- Question: {text}\
             \n- Read as: {}\
             \n- Answer: {answer}\
             \n- Tokens: {}..={}\
             \n================",
            prediction.question, prediction.span.start, prediction.span.end
        );
    }

    Ok(())
}
