//! End-to-end scenarios for the text classification pipeline.

use taxon::classify::handle::ModelHandle;
use taxon::classify::model::{TextClassifier, TextClassifierConfig};
use taxon::error::TaxonError;
use taxon::feature::tfidf::VectorizerConfig;

fn news_corpus() -> (Vec<String>, Vec<String>) {
    let texts = vec![
        "stocks rally on earnings".to_string(),
        "election results surprise voters".to_string(),
        "tech stocks surge again".to_string(),
    ];
    let labels = vec![
        "business".to_string(),
        "politics".to_string(),
        "business".to_string(),
    ];
    (texts, labels)
}

fn train_news_model() -> TextClassifier {
    let (texts, labels) = news_corpus();
    let mut model = TextClassifier::new().unwrap();
    model.fit(&texts, &labels).unwrap();
    model
}

#[test]
fn predicts_strongest_overlapping_class() {
    let model = train_news_model();

    assert_eq!(model.predict("markets stocks rally").unwrap(), "business");

    let proba = model.predict_proba("markets stocks rally").unwrap();
    let business = proba.iter().find(|(c, _)| c == "business").unwrap().1;
    let politics = proba.iter().find(|(c, _)| c == "politics").unwrap().1;
    assert!(business > politics);
}

#[test]
fn probabilities_are_a_distribution() {
    let model = train_news_model();

    for text in [
        "markets stocks rally",
        "election voters",
        "completely unrelated words",
        "",
    ] {
        let proba = model.predict_proba(text).unwrap();
        let total: f64 = proba.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-6, "probabilities sum to {total}");
        assert!(proba.iter().all(|&(_, p)| p >= 0.0));
    }
}

#[test]
fn predict_agrees_with_proba_argmax() {
    let model = train_news_model();

    for text in [
        "stocks rally",
        "voters surprise",
        "tech earnings surge",
        "nothing in vocabulary",
    ] {
        let predicted = model.predict(text).unwrap();
        let proba = model.predict_proba(text).unwrap();

        // First maximum in stable class order matches the tie-break rule
        let mut best = 0;
        for (idx, pair) in proba.iter().enumerate().skip(1) {
            if pair.1 > proba[best].1 {
                best = idx;
            }
        }
        assert_eq!(predicted, proba[best].0);
    }
}

#[test]
fn serialization_round_trips_exactly() {
    let model = train_news_model();
    let restored = TextClassifier::from_bytes(&model.to_bytes().unwrap()).unwrap();

    for text in ["markets stocks rally", "election voters", "unseen words"] {
        assert_eq!(
            model.predict(text).unwrap(),
            restored.predict(text).unwrap()
        );
        assert_eq!(
            model.predict_proba(text).unwrap(),
            restored.predict_proba(text).unwrap()
        );
    }
}

#[test]
fn save_and_load_from_disk() {
    let model = train_news_model();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("news.model");

    model.save(&path).unwrap();
    let restored = TextClassifier::load(&path).unwrap();

    assert_eq!(restored.predict("markets stocks rally").unwrap(), "business");
}

#[test]
fn out_of_vocabulary_text_predicts_highest_prior() {
    let model = train_news_model();

    // Two business documents against one politics document
    assert_eq!(model.predict("zebras gallop quickly").unwrap(), "business");
}

#[test]
fn unfitted_model_rejects_inference() {
    let model = TextClassifier::new().unwrap();

    assert!(matches!(
        model.predict("stocks rally"),
        Err(TaxonError::NotFitted(_))
    ));
    assert!(matches!(
        model.predict_proba("stocks rally"),
        Err(TaxonError::NotFitted(_))
    ));
}

#[test]
fn mismatched_training_lengths_are_rejected() {
    let (texts, _) = news_corpus();
    let mut model = TextClassifier::new().unwrap();

    let result = model.fit(&texts, &["business".to_string()]);
    assert!(matches!(result, Err(TaxonError::InvalidTrainingData(_))));
}

#[test]
fn empty_corpus_is_rejected() {
    let mut model = TextClassifier::new().unwrap();
    let result = model.fit(&[], &[]);
    assert!(matches!(result, Err(TaxonError::InvalidTrainingData(_))));
}

#[test]
fn score_counts_correct_fraction() {
    let model = train_news_model();

    let texts = vec![
        "stocks earnings rally".to_string(),
        "voters election".to_string(),
    ];
    let labels = vec!["business".to_string(), "politics".to_string()];
    let accuracy = model.score(&texts, &labels).unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
    assert!((accuracy - 1.0).abs() < 1e-12);

    // One of two labels wrong
    let labels = vec!["business".to_string(), "business".to_string()];
    let accuracy = model.score(&texts, &labels).unwrap();
    assert!((accuracy - 0.5).abs() < 1e-12);
}

#[test]
fn custom_configuration_round_trips() {
    let config = TextClassifierConfig {
        vectorizer: VectorizerConfig {
            stop_words: Some(vec!["on".to_string(), "again".to_string()]),
            min_df: 1,
            ..VectorizerConfig::default()
        },
        alpha: 0.5,
    };

    let (texts, labels) = news_corpus();
    let mut model = TextClassifier::with_config(config).unwrap();
    model.fit(&texts, &labels).unwrap();

    let restored = TextClassifier::from_bytes(&model.to_bytes().unwrap()).unwrap();
    for text in ["stocks rally again", "election on results"] {
        assert_eq!(
            model.predict_proba(text).unwrap(),
            restored.predict_proba(text).unwrap()
        );
    }
}

#[test]
fn shared_handle_serves_concurrent_readers() {
    static MODEL: ModelHandle = ModelHandle::new();

    MODEL.install(train_news_model()).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let model = MODEL.get().unwrap();
                assert_eq!(model.predict("markets stocks rally").unwrap(), "business");
                let proba = model.predict_proba("election voters").unwrap();
                let total: f64 = proba.iter().map(|(_, p)| p).sum();
                assert!((total - 1.0).abs() < 1e-6);
            });
        }
    });

    // A second install must fail rather than replace the model
    assert!(MODEL.install(train_news_model()).is_err());
}
