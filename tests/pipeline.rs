use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
use burn_qa::{
    datasets::{quora, LoadableDataset},
    models::bert,
    pipelines::question_answering::{self, driver, Training},
};
use pretty_assertions::assert_eq;

type TestBackend = Autodiff<NdArray<f32>>;

static RECORDS: &[(&str, &str)] = &[
    ("What is the capital of France? It is Paris.", "Paris"),
    ("Which language is fast and safe? Rust is.", "Rust"),
    ("Who wrote Hamlet? Shakespeare wrote it.", "Shakespeare"),
    ("What color is the sky? The sky is blue.", "blue"),
    ("How many legs does a spider have? Eight legs.", "Eight legs"),
    ("Where is the Eiffel Tower? In Paris.", "Paris"),
    ("What do bees make? Bees make honey.", "honey"),
    ("Which planet is red? Mars is red.", "Mars"),
    ("What is frozen water called? Ice.", "Ice"),
    ("Who painted the Mona Lisa? Leonardo painted it.", "Leonardo"),
];

/// Downloads `bert-base-uncased` from the Hugging Face Hub and fine-tunes it on the CPU
#[tokio::test]
#[ignore]
async fn test_fine_tune_and_evaluate() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let data_dir = dir.path().to_string_lossy().to_string();

    let path = quora::Dataset::local_path(&data_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let lines = RECORDS
        .iter()
        .map(|(question, answer)| {
            serde_json::to_string(&quora::Item::new(question.to_string(), answer.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    std::fs::write(&path, lines.join("\n"))?;

    let config = Training::new()
        .with_data_dir(data_dir.clone())
        .with_model_names(vec!["bert-base-uncased".to_string()])
        .with_max_seq_length(32)
        .with_num_workers(Some(1));

    let records = quora::Dataset::load(&data_dir).await?;
    let (train, test) = driver::prepare(records, &config);

    assert_eq!(test.items().len(), 2);

    let results = question_answering::run::<
        TestBackend,
        bert::question_answering::Model<TestBackend>,
        quora::Item,
        quora::Dataset,
    >(vec![NdArrayDevice::Cpu], train, test, &config)
    .await?;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, "bert-base-uncased");
    assert_eq!(results[0].1.samples, 2);

    let artifact_dir = config.artifact_dir("bert-base-uncased");
    for file in ["config.json", "training.json", "tokenizer.json", "model.mpk"] {
        assert!(
            std::path::Path::new(&format!("{artifact_dir}/{file}")).exists(),
            "missing {file}"
        );
    }

    let evaluation: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(format!("{artifact_dir}/evaluation.json"))?)?;

    for key in ["f1", "exact_match", "bleu", "rouge", "samples"] {
        assert!(evaluation.get(key).is_some(), "missing {key}");
    }
    for key in ["rouge1", "rouge2", "rougeL"] {
        assert!(evaluation["rouge"].get(key).is_some(), "missing rouge.{key}");
    }

    let f1 = evaluation["f1"].as_f64().unwrap_or(-1.0);
    assert!((0.0..=1.0).contains(&f1));

    Ok(())
}
