use crate::common::config::Key;
use crate::container::chained_table::ChainedTable;
use crate::planner::plan::{Highlight, NotFoundReason, Outcome, Step, StepAction};
use crate::planner::pseudocode::{chain_delete, chain_insert, chain_search};

fn hash_step(table: &ChainedTable, key: Key, code_line: usize) -> Step {
    let bucket = table.bucket_index(key);
    Step::observe(
        format!(
            "compute bucket index: {} % {} = {}",
            key,
            table.bucket_count(),
            bucket
        ),
        Highlight::Bucket(bucket),
        code_line,
    )
}

fn node_highlight(bucket: usize, node: usize, chain_len: usize) -> Highlight {
    if node < chain_len {
        Highlight::ChainNode { bucket, node }
    } else {
        Highlight::Bucket(bucket)
    }
}

fn end_of_chain(bucket: usize, key: Key, probes: usize, code_line: usize) -> Step {
    Step::observe(
        format!("reached the end of bucket {}: {} not found", bucket, key),
        Highlight::Bucket(bucket),
        code_line,
    )
    .with_outcome(Outcome::NotFound {
        reason: NotFoundReason::EndOfChain,
        probes,
    })
}

/// Head insertion: hash, allocate, link. Duplicates are not checked.
pub fn plan_insert(table: &ChainedTable, key: Key) -> Vec<Step> {
    let bucket = table.bucket_index(key);
    vec![
        hash_step(table, key, chain_insert::HASH),
        Step::observe(
            format!("allocate node for {}", key),
            Highlight::Bucket(bucket),
            chain_insert::ALLOC,
        ),
        Step::observe(
            format!("link node {} as new head of bucket {}", key, bucket),
            Highlight::ChainNode { bucket, node: 0 },
            chain_insert::LINK,
        )
        .with_action(StepAction::LinkHead { bucket, key })
        .with_outcome(Outcome::Inserted {
            position: bucket,
            probes: 0,
        }),
    ]
}

pub fn plan_search(table: &ChainedTable, key: Key) -> Vec<Step> {
    let bucket = table.bucket_index(key);
    let chain = table.bucket(bucket).unwrap_or_default();
    let mut steps = vec![
        hash_step(table, key, chain_search::HASH),
        Step::observe(
            format!("start at the head of bucket {}", bucket),
            node_highlight(bucket, 0, chain.len()),
            chain_search::HEAD,
        ),
    ];

    for (node, &value) in chain.iter().enumerate() {
        if value == key {
            steps.push(
                Step::observe(
                    format!("compare key at node {}: {} matches", node, value),
                    Highlight::ChainNode { bucket, node },
                    chain_search::MATCH,
                )
                .with_outcome(Outcome::Found {
                    position: bucket,
                    probes: node + 1,
                }),
            );
            return steps;
        }
        steps.push(Step::observe(
            format!(
                "compare key at node {}: {} is not {}, move to next",
                node, value, key
            ),
            Highlight::ChainNode { bucket, node },
            chain_search::NEXT,
        ));
    }

    steps.push(end_of_chain(
        bucket,
        key,
        chain.len(),
        chain_search::NOT_FOUND,
    ));
    steps
}

/// Delete walks `prev`/`temp` down the chain and unlinks the first match.
pub fn plan_delete(table: &ChainedTable, key: Key) -> Vec<Step> {
    let bucket = table.bucket_index(key);
    let chain = table.bucket(bucket).unwrap_or_default();
    let mut steps = vec![
        hash_step(table, key, chain_delete::HASH),
        Step::observe(
            format!("temp = head of bucket {}, prev = NULL", bucket),
            node_highlight(bucket, 0, chain.len()),
            chain_delete::HEAD,
        ),
    ];

    for (node, &value) in chain.iter().enumerate() {
        steps.push(Step::observe(
            format!("compare key at node {}: {}", node, value),
            Highlight::ChainNode { bucket, node },
            chain_delete::MATCH,
        ));

        if value != key {
            steps.push(Step::observe(
                "move prev and temp forward",
                node_highlight(bucket, node + 1, chain.len()),
                chain_delete::NEXT,
            ));
            continue;
        }

        let unlink = if node == 0 {
            Step::observe(
                format!("table[{}] = temp->next", bucket),
                Highlight::Bucket(bucket),
                chain_delete::UNLINK_HEAD,
            )
            .with_action(StepAction::UnlinkHead { bucket })
        } else {
            Step::observe(
                "prev->next = temp->next",
                Highlight::ChainNode {
                    bucket,
                    node: node - 1,
                },
                chain_delete::UNLINK_AFTER,
            )
            .with_action(StepAction::UnlinkAfter {
                bucket,
                prev: node - 1,
            })
        };
        steps.push(unlink);
        steps.push(
            Step::observe(
                format!("free node holding {}", key),
                Highlight::Bucket(bucket),
                chain_delete::FREE,
            )
            .with_outcome(Outcome::Deleted {
                position: bucket,
                probes: node + 1,
            }),
        );
        return steps;
    }

    steps.push(end_of_chain(
        bucket,
        key,
        chain.len(),
        chain_delete::NOT_FOUND,
    ));
    steps
}
