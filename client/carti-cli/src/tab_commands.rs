use carti_catalog::FeaturedList;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum TabCommands {
    /// Show the active tab and its brand
    Active,
    /// List products of the active tab
    Products {
        /// Only products of this category
        #[arg(long)]
        category: Option<String>,
    },
    /// List a featured product list of the active tab
    Featured {
        /// new-arrivals, best-sellers or deals
        #[arg(value_parser = parse_featured_list)]
        list: FeaturedList,
    },
}

fn parse_featured_list(value: &str) -> Result<FeaturedList, String> {
    value.parse().map_err(|_| {
        let known: Vec<_> = FeaturedList::ALL.iter().map(|l| l.as_str()).collect();
        format!("unknown list '{value}', expected one of {}", known.join(", "))
    })
}
