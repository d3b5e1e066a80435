use splitlog::{Field, LogPaths, Logger, SplitLogger};

fn main() {
    let dir = std::path::PathBuf::from("/tmp/splitlog_example");
    let _ = std::fs::remove_dir_all(&dir);

    let logger = SplitLogger::new(&dir, "worker", false).expect("Unable to create log files");

    std::thread::scope(|s| {
        for i in 0..4 {
            let logger = &logger;
            s.spawn(move || {
                logger.info("job started", &[Field::new("worker", i)]);
                logger.printf(format_args!("worker {i} scratch state: {:?}", [i; 3]));
                if i % 2 == 1 {
                    logger.error("job failed", &[Field::new("worker", i)]);
                }
            });
        }
    });
    logger.sync().expect("Unable to flush log files");

    let paths = LogPaths::new(&dir, "worker");
    for (level, path) in [
        ("info", &paths.info),
        ("error", &paths.error),
        ("debug", &paths.debug),
    ] {
        let content = std::fs::read_to_string(path).unwrap();
        println!("--- {level}: {} ---", path.display());
        print!("{content}");
    }
}
