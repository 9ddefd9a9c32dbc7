use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    pub footer: Option<String>,
}

impl Formatter {
    pub fn build<T: Tabled, I: IntoIterator<Item = T>>(self, data: I) -> Table {
        let mut table = Table::new(data);
        if let Some(footer) = self.footer {
            table.with(Panel::footer(footer));
        }
        table.with(Style::blank());
        table
    }
}
