//! region-outline - print the outliner tree of a region list
//!
//! Usage: `region-outline <regions.json> [manual|label|type] [date|score]`
//!
//! The input is a JSON array of regions as exported by the annotation
//! tool. Settings come from the user's `regions-config.json` when present.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    cli::main()
}

// The browser build has no command line
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::process::ExitCode;

    use hvat_regions::config::StoreConfig;
    use hvat_regions::preferences::MemoryPreferences;
    use hvat_regions::tree::{GroupNode, TreeItem};
    use hvat_regions::{GroupingMode, Region, RegionData, RegionStore, SortKey};

    pub(crate) fn main() -> ExitCode {
        let config = StoreConfig::load_from_default_path().unwrap_or_default();
        let default_level = config.log_level.to_level_filter().as_str();
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

        let args: Vec<String> = std::env::args().skip(1).collect();
        let Some(path) = args.first() else {
            eprintln!("Usage: region-outline <regions.json> [manual|label|type] [date|score]");
            return ExitCode::FAILURE;
        };

        match run(
            &config,
            path,
            args.get(1).map(String::as_str),
            args.get(2).map(String::as_str),
        ) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("region-outline: {}", e);
                ExitCode::FAILURE
            }
        }
    }

    fn run(
        config: &StoreConfig,
        path: &str,
        mode: Option<&str>,
        sort: Option<&str>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        let regions: Vec<RegionData> = serde_json::from_str(&json)?;
        log::info!("Loaded {} regions from {}", regions.len(), path);

        let mut store = RegionStore::new(Box::new(MemoryPreferences::new()), config, None);
        store.extend(regions.into_iter().map(Region::from))?;

        if let Some(sort) = sort {
            store.set_sort(sort.parse::<SortKey>()?);
        }
        let mode = match mode {
            Some(mode) => mode.parse::<GroupingMode>()?,
            None => store.outliner().grouping(),
        };

        let tree = store.regions_tree_with(mode, describe);
        if tree.is_empty() {
            println!("(no regions)");
        }
        print_tree(tree.roots());
        Ok(())
    }

    /// One display line per tree node.
    fn describe(item: TreeItem<'_>, _index: usize, _header: bool) -> String {
        match item {
            TreeItem::Region(region) => {
                let mut line = format!("{} [{}]", region.id(), region.region_type().display_name());
                if let Some(score) = region.score {
                    line.push_str(&format!(" score={:.2}", score));
                }
                if region.is_hidden() {
                    line.push_str(" (hidden)");
                }
                line
            }
            TreeItem::Label(label) => match &label.hotkey {
                Some(key) => format!("{} ({})", label.value, key),
                None => label.value.clone(),
            },
            TreeItem::Unlabeled => "No label".to_string(),
            TreeItem::Type(ty) => ty.display_name().to_string(),
        }
    }

    fn print_tree(roots: &[GroupNode<String>]) {
        let mut stack: Vec<(&GroupNode<String>, usize)> = roots.iter().rev().map(|n| (n, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            let marker = if node.is_group { "+" } else { "-" };
            println!("{}{} {}", "  ".repeat(depth), marker, node.data);
            stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
        }
    }
}
