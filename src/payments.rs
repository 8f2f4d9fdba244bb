//! Display grouping for a student's payment list.
//!
//! Pure transform: the flat `payments` array the backend embeds in a
//! student record becomes the row model the payment table renders.
//! Nothing here mutates backend state.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::{Payment, PaymentStatus, PaymentType};

/// One row of the payment table. Installment plans collapse into a single
/// group row anchored at installment 1; payments that reference a debt
/// via `relatedDebtId` hang off that debt's row as children.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum PaymentRow {
    #[serde(rename = "single", rename_all = "camelCase")]
    Single {
        payment: Payment,
        children: Vec<Payment>,
    },
    #[serde(rename = "installmentGroup", rename_all = "camelCase")]
    InstallmentGroup {
        description: String,
        total_installments: u32,
        total_amount: f64,
        status: PaymentStatus,
        /// Sorted by installment number; the first member is the anchor.
        members: Vec<Payment>,
        children: Vec<Payment>,
    },
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    description: String,
    total_installments: u32,
}

fn group_key(p: &Payment) -> Option<GroupKey> {
    if p.installment_number.is_none() {
        return None;
    }
    match p.payment_type {
        PaymentType::Debt | PaymentType::Installment => Some(GroupKey {
            description: p.description.clone().unwrap_or_default(),
            total_installments: p.total_installments.unwrap_or(0),
        }),
        PaymentType::Payment => None,
    }
}

fn group_status(members: &[Payment]) -> PaymentStatus {
    if members.iter().all(|m| m.status == PaymentStatus::Paid) {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Pending
    }
}

pub fn payment_rows(payments: &[Payment]) -> Vec<PaymentRow> {
    // Pass 1: children by the debt they satisfy.
    let mut children_of: HashMap<String, Vec<Payment>> = HashMap::new();
    let known_ids: HashSet<&str> = payments.iter().map(|p| p.id.as_str()).collect();
    let mut top_level: Vec<&Payment> = Vec::new();
    for p in payments {
        match &p.related_debt_id {
            // A dangling reference degrades to a top-level row rather than
            // vanishing from the table.
            Some(debt_id) if known_ids.contains(debt_id.as_str()) => {
                children_of.entry(debt_id.clone()).or_default().push(p.clone());
            }
            _ => top_level.push(p),
        }
    }

    // Pass 2: emit rows in backend order, collapsing installment plans the
    // first time their key is seen.
    let mut rows: Vec<PaymentRow> = Vec::new();
    let mut emitted: HashSet<GroupKey> = HashSet::new();
    for p in &top_level {
        let Some(key) = group_key(p) else {
            let children = children_of.remove(&p.id).unwrap_or_default();
            rows.push(PaymentRow::Single {
                payment: (*p).clone(),
                children,
            });
            continue;
        };
        if !emitted.insert(key.clone()) {
            continue;
        }

        let mut members: Vec<Payment> = top_level
            .iter()
            .filter(|c| group_key(c).as_ref() == Some(&key))
            .map(|c| (*c).clone())
            .collect();
        members.sort_by_key(|m| m.installment_number.unwrap_or(u32::MAX));

        let mut children: Vec<Payment> = Vec::new();
        for m in &members {
            children.extend(children_of.remove(&m.id).unwrap_or_default());
        }

        rows.push(PaymentRow::InstallmentGroup {
            description: key.description,
            total_installments: key.total_installments,
            total_amount: members.iter().map(|m| m.amount).sum(),
            status: group_status(&members),
            members,
            children,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PaymentMethod;
    use chrono::NaiveDate;

    fn payment(id: &str, amount: f64, payment_type: PaymentType, status: PaymentStatus) -> Payment {
        Payment {
            id: id.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            method: PaymentMethod::Cash,
            status,
            payment_type,
            description: None,
            installment_number: None,
            total_installments: None,
            related_debt_id: None,
        }
    }

    fn installment(id: &str, n: u32, of: u32, desc: &str, status: PaymentStatus) -> Payment {
        let mut p = payment(id, 500.0, PaymentType::Installment, status);
        p.description = Some(desc.to_string());
        p.installment_number = Some(n);
        p.total_installments = Some(of);
        p
    }

    #[test]
    fn two_installments_collapse_into_one_pending_group() {
        let rows = payment_rows(&[
            installment("1", 1, 2, "D", PaymentStatus::Paid),
            installment("2", 2, 2, "D", PaymentStatus::Pending),
        ]);
        assert_eq!(rows.len(), 1);
        match &rows[0] {
            PaymentRow::InstallmentGroup {
                total_amount,
                status,
                members,
                ..
            } => {
                assert_eq!(*total_amount, 1000.0);
                assert_eq!(*status, PaymentStatus::Pending);
                assert_eq!(members[0].installment_number, Some(1));
            }
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn fully_paid_group_reports_paid() {
        let rows = payment_rows(&[
            installment("1", 1, 2, "D", PaymentStatus::Paid),
            installment("2", 2, 2, "D", PaymentStatus::Paid),
        ]);
        match &rows[0] {
            PaymentRow::InstallmentGroup { status, .. } => assert_eq!(*status, PaymentStatus::Paid),
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn distinct_descriptions_do_not_merge() {
        let rows = payment_rows(&[
            installment("1", 1, 2, "Kurs Ücreti", PaymentStatus::Pending),
            installment("2", 1, 2, "Sınav Harcı", PaymentStatus::Pending),
        ]);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn plain_payment_stays_single() {
        let rows = payment_rows(&[payment("1", 250.0, PaymentType::Payment, PaymentStatus::Paid)]);
        assert!(matches!(rows[0], PaymentRow::Single { .. }));
    }

    #[test]
    fn related_payment_becomes_child_of_its_debt() {
        let debt = payment("d1", 1000.0, PaymentType::Debt, PaymentStatus::Pending);
        let mut settles = payment("p1", 1000.0, PaymentType::Payment, PaymentStatus::Paid);
        settles.related_debt_id = Some("d1".to_string());

        let rows = payment_rows(&[debt, settles]);
        assert_eq!(rows.len(), 1);
        match &rows[0] {
            PaymentRow::Single { payment, children } => {
                assert_eq!(payment.id, "d1");
                assert_eq!(children.len(), 1);
                assert_eq!(children[0].id, "p1");
            }
            other => panic!("expected single, got {:?}", other),
        }
    }

    #[test]
    fn child_of_group_member_lands_on_the_group() {
        let first = installment("i1", 1, 2, "D", PaymentStatus::Paid);
        let second = installment("i2", 2, 2, "D", PaymentStatus::Pending);
        let mut child = payment("p1", 500.0, PaymentType::Payment, PaymentStatus::Paid);
        child.related_debt_id = Some("i2".to_string());

        let rows = payment_rows(&[first, second, child]);
        assert_eq!(rows.len(), 1);
        match &rows[0] {
            PaymentRow::InstallmentGroup { children, .. } => {
                assert_eq!(children.len(), 1);
                assert_eq!(children[0].id, "p1");
            }
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn dangling_debt_reference_stays_visible() {
        let mut orphan = payment("p1", 500.0, PaymentType::Payment, PaymentStatus::Paid);
        orphan.related_debt_id = Some("gone".to_string());
        let rows = payment_rows(&[orphan]);
        assert_eq!(rows.len(), 1);
        assert!(matches!(rows[0], PaymentRow::Single { .. }));
    }
}
