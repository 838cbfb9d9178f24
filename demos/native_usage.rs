use shadow_rust::{LoadOptions, Model, NativeEngine, PredictionOptions, Record};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Note: needs libshadow on the link path (see SHADOW_LIB_DIR)
    // and a model at SHADOW_MODEL_LOCATION
    let load_options = LoadOptions::from_env()?;
    println!("Loading model from: {}", load_options.location());
    let model = Model::load(NativeEngine, &load_options)?;

    let options = PredictionOptions::builder()
        .threshold(0.5)
        .compute_feature_contributions(true)
        .build()?;

    let mut record = Record::new();
    record.insert("age".to_owned(), 63.0f32.into());
    record.insert("chest_pain".to_owned(), "typical angina".into());
    record.insert("resting_blood_pressure".to_owned(), 145.0f32.into());

    let output = model.predict(&record, &options)?;
    println!("Prediction: {}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
