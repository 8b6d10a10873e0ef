//! Command overview text.

use crate::CommandReply;

const HELP_TEXT: &str = "\
Commands:
  add <public|private> <names>     add comma-separated names to a watchlist
  remove <public|private> <names>  remove names from a watchlist
  list [public|private]            browse the watchlists
  search <name>                    search both watchlists
  locked                           browse currently locked channels
  find <name>                      locked channels for a spawn name
  ranking                          spawns ranked by locked-channel count
  lock [channel] [label]           manually lock a spawn channel
  unlock [channel]                 release one lock
  unlock all <name>                release every lock for a spawn name
  status                           counters and configuration summary
  help                             this overview";

#[must_use]
pub fn help() -> CommandReply {
    CommandReply::text(HELP_TEXT)
}
