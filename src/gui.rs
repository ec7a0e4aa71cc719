#![windows_subsystem = "windows"]

use eframe::egui;
use egui_plot::{Bar, BarChart, Plot};
use modfibo::config::timestamp;
use modfibo::{collect_runs, Alphabet, Run, RunHistogram};
use std::fs::File;
use std::io::{BufWriter, Write as IoWrite};
use std::path::PathBuf;
use std::time::Instant;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_title("Modulo Fibonacci"),
        ..Default::default()
    };
    eframe::run_native(
        "modfibo",
        options,
        Box::new(|cc| {
            setup_japanese_font(&cc.egui_ctx);
            Ok(Box::new(ModFiboApp::default()))
        }),
    )
}

fn setup_japanese_font(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    let font_paths = [
        "C:\\Windows\\Fonts\\YuGothR.ttc",
        "C:\\Windows\\Fonts\\meiryo.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    ];
    for path in &font_paths {
        if let Ok(data) = std::fs::read(path) {
            fonts.font_data.insert(
                "japanese".to_owned(),
                egui::FontData::from_owned(data),
            );
            fonts.families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .insert(0, "japanese".to_owned());
            fonts.families
                .entry(egui::FontFamily::Monospace)
                .or_default()
                .push("japanese".to_owned());
            break;
        }
    }
    ctx.set_fonts(fonts);
}

fn output_dir() -> PathBuf {
    let dir = std::env::var_os(modfibo::config::ENV_OUTPUT_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(modfibo::config::DEFAULT_OUTPUT_DIR));
    std::fs::create_dir_all(&dir).ok();
    dir
}

const SEED_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 80, 200);
const RUN_COLOR: egui::Color32 = egui::Color32::from_rgb(60, 190, 200);

// ─── データ構造 ─────────────────────────────────────

struct Enumerated {
    modulus: u32,
    runs: Vec<Run>,
    histogram: RunHistogram,
    pisano_period: u64,
    elapsed_us: u128,
    save_path: Option<String>,
}

struct ModFiboApp {
    modulus: u32,
    alphabet: Alphabet,
    result: Option<Enumerated>,
    error: Option<String>,
}

impl Default for ModFiboApp {
    fn default() -> Self {
        ModFiboApp {
            modulus: 10,
            alphabet: Alphabet::default(),
            result: None,
            error: None,
        }
    }
}

impl ModFiboApp {
    fn run_enumeration(&mut self) {
        let timer = Instant::now();
        match collect_runs(self.modulus) {
            Ok(runs) => {
                let histogram = RunHistogram::from_runs(&runs);
                let fibonacci_seed = (0, 1 % self.modulus);
                let pisano_period = runs
                    .iter()
                    .find(|r| r.seed() == fibonacci_seed)
                    .map_or(0, |r| r.len() as u64);
                self.result = Some(Enumerated {
                    modulus: self.modulus,
                    runs,
                    histogram,
                    pisano_period,
                    elapsed_us: timer.elapsed().as_micros(),
                    save_path: None,
                });
                self.error = None;
            }
            Err(e) => {
                self.result = None;
                self.error = Some(e.to_string());
            }
        }
    }

    fn save(&mut self) {
        let Some(res) = self.result.as_mut() else { return };
        let path = output_dir().join(format!("runs_m{}_{}.txt", res.modulus, timestamp()));
        let written = File::create(&path).and_then(|file| {
            let mut w = BufWriter::new(file);
            writeln!(w, "# modfibo runs")?;
            writeln!(w, "modulus = {}", res.modulus)?;
            for run in &res.runs {
                let (seed, body) = self.alphabet.display_parts(run);
                writeln!(w, "{}{}", seed, body)?;
            }
            for line in res.histogram.summary_lines() {
                writeln!(w, "{}", line)?;
            }
            w.flush()
        });
        match written {
            Ok(()) => res.save_path = Some(path.display().to_string()),
            Err(e) => self.error = Some(format!("保存に失敗: {}", e)),
        }
    }

    fn summary_ui(ui: &mut egui::Ui, res: &Enumerated) {
        let hist = &res.histogram;
        egui::Grid::new("summary").num_columns(2).show(ui, |ui| {
            ui.label("ラン数");
            ui.label(hist.total_runs().to_string());
            ui.end_row();
            ui.label("最長ラン");
            ui.label(hist.longest().unwrap_or(0).to_string());
            ui.end_row();
            ui.label("ピサノ周期");
            ui.label(res.pisano_period.to_string());
            ui.end_row();
            ui.label("共通周期");
            ui.label(hist.common_period().to_string());
            ui.end_row();
            ui.label("計算時間");
            ui.label(format!("{} µs", res.elapsed_us));
            ui.end_row();
        });
        ui.label(hist.histogram_line());
    }

    fn histogram_ui(ui: &mut egui::Ui, hist: &RunHistogram) {
        let bars: Vec<Bar> = hist
            .entries()
            .map(|(len, count)| Bar::new(len as f64, count as f64).width(0.8))
            .collect();
        Plot::new("run_length_histogram")
            .height(200.0)
            .allow_scroll(false)
            .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars)));
    }

    fn runs_ui(ui: &mut egui::Ui, res: &Enumerated, alphabet: &Alphabet) {
        let row_height = ui.text_style_height(&egui::TextStyle::Monospace);
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show_rows(ui, row_height, res.runs.len(), |ui, range| {
                for run in &res.runs[range] {
                    let (seed, body) = alphabet.display_parts(run);
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 0.0;
                        ui.label(
                            egui::RichText::new(seed)
                                .monospace()
                                .strong()
                                .color(SEED_COLOR),
                        );
                        ui.label(
                            egui::RichText::new(body)
                                .monospace()
                                .color(RUN_COLOR),
                        );
                    });
                }
            });
    }
}

impl eframe::App for ModFiboApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("法 M:");
                let max = self.alphabet.len() as u32;
                ui.add(egui::DragValue::new(&mut self.modulus).range(1..=max));
                if ui.button("列挙").clicked() {
                    self.run_enumeration();
                }
                if ui
                    .add_enabled(self.result.is_some(), egui::Button::new("保存"))
                    .clicked()
                {
                    self.save();
                }
            });
            if let Some(err) = &self.error {
                ui.colored_label(egui::Color32::RED, err);
            }
            if let Some(path) = self.result.as_ref().and_then(|r| r.save_path.as_ref()) {
                ui.label(format!("保存: {}", path));
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(res) = &self.result else {
                ui.label("法 M を選んで「列挙」を押す");
                return;
            };
            Self::summary_ui(ui, res);
            ui.separator();
            Self::histogram_ui(ui, &res.histogram);
            ui.separator();
            Self::runs_ui(ui, res, &self.alphabet);
        });
    }
}
