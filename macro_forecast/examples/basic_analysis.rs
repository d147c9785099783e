use chrono::{Duration, NaiveDate};
use macro_forecast::models::{ForecastModel, TrainedForecastModel};
use macro_forecast::{
    analyze, AnalysisConfig, ArimaModel, ArimaOrder, SourceFormat, SystemClock, UserParameters,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Macro Forecast: Basic Analysis Example");
    println!("======================================\n");

    // Create sample data
    println!("Creating sample data...");
    let csv = create_sample_csv(36)?;
    println!("Sample data created: 36 monthly rows\n");

    // Fit a single model directly
    let revenue: Vec<f64> = (0..36).map(|i| 5.0 + 0.1 * i as f64).collect();
    let trained = ArimaModel::new(ArimaOrder::default())?.train(&revenue)?;
    let forecast = trained.forecast(3)?;
    println!("{} forecast (3 months): {:?}", trained.name(), forecast.values());
    if let Some(intervals) = forecast.intervals() {
        for (i, (lower, upper)) in intervals.iter().enumerate() {
            println!("  Month {}: ({:.2}, {:.2})", i + 1, lower, upper);
        }
    }

    // Run the whole pipeline into a scratch directory
    println!("\nRunning the analysis pipeline...");
    let out_dir = std::env::temp_dir().join("macro_forecast_example");
    let mut config = AnalysisConfig::default();
    config.results_dir = out_dir.join("results");
    config.visualizations_dir = out_dir.join("visualizations");

    let params = UserParameters::new(3.0, 4.5, 1.05)?;
    let report = analyze(csv.as_bytes(), SourceFormat::DelimitedText, &params, &config, &SystemClock)?;

    for prediction in &report.predictions {
        println!(
            "  {:<15} original {:>10.3}  adjusted {:>10.3}  change {:>7.2}%",
            prediction.metric, prediction.original, prediction.adjusted, prediction.change_percent
        );
    }

    println!("\nResults saved to {}", report.results_file.display());
    match &report.visualizations {
        Ok(manifest) => {
            for (name, path) in manifest.iter() {
                println!("  {}: {}", name, path.display());
            }
        }
        Err(e) => println!("Charts could not be rendered: {}", e),
    }

    Ok(())
}

fn create_sample_csv(rows: usize) -> Result<String, Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2021, 1, 1).ok_or("invalid start date")?;
    let mut csv =
        String::from("Date,Inflation_Rate,Interest_Rate,Revenue_Growth,Profit_Margin,Cash_Flow\n");

    for i in 0..rows {
        let t = i as f64;
        let date = start + Duration::days(30 * i as i64);
        csv.push_str(&format!(
            "{},{:.3},{:.3},{:.3},{:.3},{:.1}\n",
            date.format("%Y-%m-%d"),
            2.0 + 0.4 * (t / 6.0).sin(),
            3.5 + 0.02 * t,
            5.0 + 0.1 * t + 0.2 * (t / 2.0).sin(),
            12.0 + 0.3 * (t / 3.0).cos(),
            1000.0 + 12.0 * t + 20.0 * (t / 4.0).sin(),
        ));
    }

    Ok(csv)
}
