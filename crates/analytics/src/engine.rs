use crate::breach::BreachDetector;
use crate::error::AnalyticsError;
use crate::report::{DataQualitySummary, HighestValueOrder, OrderEdges, SlaBreach};
use crate::statistics::{DecimalStatistics, Statistics, reduce, reduce_partitioned};
use chrono::{NaiveDate, NaiveDateTime};
use configuration::AnalyticsSettings;
use core_types::{Customer, Order, Product, Transaction, YearMonth};
use rayon::prelude::*;
use risk::{RiskScorer, TrigonometricRiskScorer};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

/// A stateless calculator for the order reports.
///
/// Every report is a pure function of its arguments: the engine only holds
/// thresholds and the risk scorer, never data, so a single engine can serve
/// concurrent callers.
pub struct AnalyticsEngine {
    settings: AnalyticsSettings,
    breach_detector: BreachDetector,
    risk_scorer: Box<dyn RiskScorer>,
}

impl fmt::Debug for AnalyticsEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticsEngine")
            .field("settings", &self.settings)
            .field("breach_detector", &self.breach_detector)
            .finish_non_exhaustive()
    }
}

impl AnalyticsEngine {
    /// Builds an engine from validated settings, using the trigonometric risk scorer.
    pub fn new(settings: AnalyticsSettings) -> Result<Self, AnalyticsError> {
        settings.validate()?;
        let breach_detector = BreachDetector::from_settings(&settings.breach)?;
        let risk_scorer = Box::new(TrigonometricRiskScorer::from_settings(&settings.risk)?);
        Ok(Self {
            settings,
            breach_detector,
            risk_scorer,
        })
    }

    /// Replaces the risk scorer used by `risk_scores` and `risk_scores_parallel`.
    pub fn with_risk_scorer(mut self, risk_scorer: Box<dyn RiskScorer>) -> Self {
        self.risk_scorer = risk_scorer;
        self
    }

    pub fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    /// The customers who spent the most in `period`, best first.
    ///
    /// Orders without a customer or outside the month are ignored. Spend is
    /// aggregated per customer id; ties keep the order in which customers
    /// were first encountered. At most `reports.top_spenders_limit`
    /// customers are returned.
    #[tracing::instrument(name = "top_customers_by_spend", skip_all, fields(orders = orders.len(), %period))]
    pub fn top_customers_by_spend(&self, orders: &[Order], period: YearMonth) -> Vec<Customer> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut ranked: Vec<(&Customer, Decimal)> = Vec::new();

        for order in orders {
            let Some(customer) = order.customer.as_ref() else {
                continue;
            };
            if !period.contains(&order.order_date) {
                continue;
            }

            let order_total = order.total_value();
            match positions.get(customer.id.as_str()) {
                Some(&idx) => ranked[idx].1 = ranked[idx].1.saturating_add(order_total),
                None => {
                    positions.insert(customer.id.as_str(), ranked.len());
                    ranked.push((customer, order_total));
                }
            }
        }

        // Stable, so equal spend keeps encounter order.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        tracing::debug!(qualifying_customers = ranked.len(), "Ranked customers by spend.");

        ranked
            .into_iter()
            .take(self.settings.reports.top_spenders_limit)
            .map(|(customer, _)| customer.clone())
            .collect()
    }

    /// Average transaction value per product category.
    ///
    /// Only transactions with a product and a category count. Categories with
    /// `reports.category_min_transactions` or fewer transactions are left out.
    #[tracing::instrument(name = "average_transaction_value_per_category", skip_all, fields(orders = orders.len()))]
    pub fn average_transaction_value_per_category(&self, orders: &[Order]) -> BTreeMap<String, f64> {
        let mut groups: BTreeMap<&str, (usize, Decimal)> = BTreeMap::new();

        for txn in orders.iter().flat_map(Order::transactions) {
            let Some(category) = txn.category() else {
                continue;
            };
            let entry = groups.entry(category).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 = entry.1.saturating_add(txn.total_value());
        }

        let threshold = self.settings.reports.category_min_transactions;
        let averages: BTreeMap<String, f64> = groups
            .into_iter()
            .filter(|(_, (count, _))| *count > threshold)
            .map(|(category, (count, sum))| {
                let average = sum.to_f64().unwrap_or(0.0) / count as f64;
                (category.to_string(), average)
            })
            .collect();

        tracing::debug!(categories = averages.len(), threshold, "Computed category averages.");
        averages
    }

    /// Customers with clustered transaction failures, in order of first appearance.
    #[tracing::instrument(name = "detect_sla_breaches", skip_all, fields(orders = orders.len()))]
    pub fn detect_sla_breaches(&self, orders: &[Order]) -> Vec<Customer> {
        self.sla_breach_windows(orders)
            .into_iter()
            .map(|breach| breach.customer)
            .collect()
    }

    /// Like [`AnalyticsEngine::detect_sla_breaches`], but reports the window that tripped each customer.
    pub fn sla_breach_windows(&self, orders: &[Order]) -> Vec<SlaBreach> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut failures: Vec<(&Customer, Vec<NaiveDateTime>)> = Vec::new();

        for order in orders {
            let Some(customer) = order.customer.as_ref() else {
                continue;
            };
            for txn in order.transactions().filter(|t| t.is_failed()) {
                let idx = *positions.entry(customer.id.as_str()).or_insert_with(|| {
                    failures.push((customer, Vec::new()));
                    failures.len() - 1
                });
                failures[idx].1.push(txn.timestamp);
            }
        }

        let candidates = failures
            .iter()
            .filter(|(_, f)| f.len() >= self.breach_detector.min_failures())
            .count();

        let breaches: Vec<SlaBreach> = failures
            .into_iter()
            .filter_map(|(customer, timestamps)| {
                let failed_transactions = timestamps.len();
                self.breach_detector
                    .detect(timestamps)
                    .map(|window| SlaBreach {
                        customer: customer.clone(),
                        failed_transactions,
                        window,
                    })
            })
            .collect();

        tracing::debug!(candidates, breaches = breaches.len(), "SLA breach scan finished.");
        breaches
    }

    /// The order with the highest total value and its first and last transactions.
    ///
    /// Orders without at least one present transaction are not eligible. On a
    /// tie the earliest order wins.
    #[tracing::instrument(name = "highest_value_order_edges", skip_all, fields(orders = orders.len()))]
    pub fn highest_value_order_edges(&self, orders: &[Order]) -> HighestValueOrder {
        let mut best: Option<(&Order, Decimal)> = None;

        for order in orders.iter().filter(|o| o.transactions().next().is_some()) {
            let total = order.total_value();
            if best.is_none_or(|(_, best_total)| total > best_total) {
                best = Some((order, total));
            }
        }

        let Some((order, total_value)) = best else {
            tracing::debug!("No order with transactions found.");
            return HighestValueOrder::NoValidOrders;
        };

        HighestValueOrder::Found(OrderEdges {
            order_id: order.id,
            total_value,
            first_transaction: order.transactions().next().cloned(),
            last_transaction: order.transactions().last().cloned(),
        })
    }

    /// Statistics over the catalog prices.
    pub fn product_statistics(&self, products: &[Product]) -> Statistics {
        reduce(products, &DecimalStatistics::new(|p: &Product| Some(p.price)))
    }

    /// [`AnalyticsEngine::product_statistics`] computed on the rayon pool.
    pub fn product_statistics_parallel(&self, products: &[Product]) -> Statistics {
        reduce_partitioned(
            products,
            &DecimalStatistics::new(|p: &Product| Some(p.price)),
            self.settings.execution.min_partition_len,
        )
    }

    /// Statistics over the value of every present transaction of every order.
    pub fn transaction_value_statistics(&self, orders: &[Order]) -> Statistics {
        reduce(
            orders.iter().flat_map(Order::transactions),
            &DecimalStatistics::new(|t: &Transaction| Some(t.total_value())),
        )
    }

    /// Synthetic risk score per order id.
    ///
    /// When two orders share an id, the first one's score is kept.
    #[tracing::instrument(name = "risk_scores", skip_all, fields(orders = orders.len()))]
    pub fn risk_scores(&self, orders: &[Order]) -> HashMap<Uuid, Decimal> {
        let mut scores = HashMap::with_capacity(orders.len());
        for order in orders {
            scores
                .entry(order.id)
                .or_insert_with(|| self.risk_scorer.score(order));
        }
        scores
    }

    /// [`AnalyticsEngine::risk_scores`] computed on the rayon pool.
    ///
    /// Scores are computed independently per order and collected in input
    /// order, so id collisions resolve exactly as in the sequential version.
    #[tracing::instrument(name = "risk_scores_parallel", skip_all, fields(orders = orders.len()))]
    pub fn risk_scores_parallel(&self, orders: &[Order]) -> HashMap<Uuid, Decimal> {
        let scored: Vec<(Uuid, Decimal)> = orders
            .par_iter()
            .with_min_len(self.settings.execution.min_partition_len)
            .map(|order| (order.id, self.risk_scorer.score(order)))
            .collect();

        let mut scores = HashMap::with_capacity(scored.len());
        for (id, score) in scored {
            scores.entry(id).or_insert(score);
        }
        scores
    }

    /// Total sales per calendar day from `start` to `end`, both inclusive.
    ///
    /// Days without orders are present with a zero total. An inverted range
    /// yields an empty report.
    #[tracing::instrument(name = "daily_sales", skip_all, fields(orders = orders.len(), %start, %end))]
    pub fn daily_sales(
        &self,
        orders: &[Order],
        start: NaiveDate,
        end: NaiveDate,
    ) -> BTreeMap<NaiveDate, Decimal> {
        let mut report: BTreeMap<NaiveDate, Decimal> = start
            .iter_days()
            .take_while(|day| *day <= end)
            .map(|day| (day, Decimal::ZERO))
            .collect();

        for order in orders {
            if let Some(total) = report.get_mut(&order.order_day()) {
                *total = total.saturating_add(order.total_value());
            }
        }
        report
    }

    /// Orders sorted ascending by total value, restricted to `[min, max]`.
    ///
    /// After sorting, orders below `min` are skipped and orders are taken
    /// until the first one above `max`.
    pub fn orders_in_price_range<'a>(
        &self,
        orders: &'a [Order],
        min: Decimal,
        max: Decimal,
    ) -> Vec<&'a Order> {
        let mut by_total: Vec<(Decimal, &Order)> =
            orders.iter().map(|o| (o.total_value(), o)).collect();
        by_total.sort_by(|a, b| a.0.cmp(&b.0));

        by_total
            .into_iter()
            .skip_while(|(total, _)| *total < min)
            .take_while(|(total, _)| *total <= max)
            .map(|(_, order)| order)
            .collect()
    }

    /// Every non-blank address of a customer, primary first, without duplicates.
    pub fn customer_emails(&self, customer: Option<&Customer>) -> Vec<String> {
        let Some(customer) = customer else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        customer
            .email
            .iter()
            .chain(customer.secondary_emails.iter().flatten())
            .filter(|email| !email.trim().is_empty())
            .filter(|email| seen.insert(email.as_str()))
            .cloned()
            .collect()
    }

    /// Counts the malformed records in a batch.
    pub fn data_quality(&self, orders: &[Order]) -> DataQualitySummary {
        let mut ids = HashSet::with_capacity(orders.len());
        let mut summary = DataQualitySummary {
            total_orders: orders.len(),
            ..DataQualitySummary::default()
        };

        for order in orders {
            if order.customer.is_none() {
                summary.orders_without_customer += 1;
            }
            if order.transactions.is_empty() {
                summary.orders_without_transactions += 1;
            }
            summary.null_transactions += order.null_transaction_count();
            if !ids.insert(order.id) {
                summary.duplicate_order_ids += 1;
            }
        }

        if summary.orders_without_customer > 0 || summary.null_transactions > 0 {
            tracing::debug!(?summary, "Order batch contains malformed records.");
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CustomerTier, TransactionStatus};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn customer(id: &str) -> Customer {
        Customer::new(id, format!("Customer {id}"), None, Some(CustomerTier::Premium), None)
    }

    fn product(category: Option<&str>, price: Decimal) -> Product {
        Product::new("PROD-1", "Widget", category.map(str::to_string), Some(price), Some(5))
    }

    fn txn(id: &str, quantity: i32, unit_price: Decimal, timestamp: NaiveDateTime) -> Transaction {
        Transaction::new(
            id,
            None,
            Some(quantity),
            Some(unit_price),
            timestamp,
            Some(TransactionStatus::Success),
        )
    }

    fn failed(id: &str, timestamp: NaiveDateTime) -> Transaction {
        Transaction::new(id, None, Some(1), Some(dec!(1)), timestamp, Some(TransactionStatus::Failed))
    }

    fn order(customer: Option<Customer>, date: NaiveDateTime, txns: Vec<Transaction>) -> Order {
        Order::new(None, customer, date, Some(txns.into_iter().map(Some).collect()), "SUCCESS")
    }

    fn engine() -> AnalyticsEngine {
        AnalyticsEngine::new(AnalyticsSettings::default()).unwrap()
    }

    fn eager_engine() -> AnalyticsEngine {
        let mut settings = AnalyticsSettings::default();
        settings.execution.min_partition_len = 1;
        settings.risk.iterations = 50;
        AnalyticsEngine::new(settings).unwrap()
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut settings = AnalyticsSettings::default();
        settings.risk.iterations = 0;
        assert!(matches!(
            AnalyticsEngine::new(settings),
            Err(AnalyticsError::Configuration(_))
        ));
    }

    #[test]
    fn top_spenders_are_ranked_within_the_month() {
        let march = YearMonth::new(2024, 3).unwrap();
        let orders = vec![
            order(Some(customer("A")), at(3, 1, 9), vec![txn("a1", 1, dec!(100), at(3, 1, 9))]),
            order(Some(customer("B")), at(3, 2, 9), vec![txn("b1", 3, dec!(100), at(3, 2, 9))]),
            order(Some(customer("C")), at(3, 3, 9), vec![txn("c1", 2, dec!(100), at(3, 3, 9))]),
            order(Some(customer("D")), at(3, 4, 9), vec![txn("d1", 1, dec!(50), at(3, 4, 9))]),
            // A's second March order pushes them to the top.
            order(Some(customer("A")), at(3, 20, 9), vec![txn("a2", 5, dec!(100), at(3, 20, 9))]),
            // February spend does not count for March.
            order(Some(customer("D")), at(2, 28, 9), vec![txn("d2", 100, dec!(100), at(2, 28, 9))]),
            order(None, at(3, 5, 9), vec![txn("x1", 100, dec!(100), at(3, 5, 9))]),
        ];

        let top = engine().top_customers_by_spend(&orders, march);
        let ids: Vec<&str> = top.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);

        let february = engine().top_customers_by_spend(&orders, march.previous());
        let ids: Vec<&str> = february.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["D"]);
    }

    #[test]
    fn top_spender_ties_keep_encounter_order() {
        let march = YearMonth::new(2024, 3).unwrap();
        let orders = vec![
            order(Some(customer("late")), at(3, 1, 9), vec![]),
            order(Some(customer("first")), at(3, 2, 9), vec![txn("f", 1, dec!(10), at(3, 2, 9))]),
            order(Some(customer("second")), at(3, 3, 9), vec![txn("s", 2, dec!(5), at(3, 3, 9))]),
        ];

        let top = engine().top_customers_by_spend(&orders, march);
        let ids: Vec<&str> = top.iter().map(|c| c.id.as_str()).collect();
        // The empty order still makes its customer a (zero-spend) candidate.
        assert_eq!(ids, vec!["first", "second", "late"]);

        let april = YearMonth::new(2024, 4).unwrap();
        assert!(engine().top_customers_by_spend(&orders, april).is_empty());
    }

    #[test]
    fn category_average_requires_more_than_fifty_transactions() {
        let day = at(5, 1, 12);
        let books: Vec<Transaction> = (0..51)
            .map(|i| {
                let mut t = txn(&format!("b{i}"), 1 + i % 3, dec!(12.34), day);
                t.product = Some(product(Some("Books"), dec!(12.34)));
                t
            })
            .collect();
        let toys: Vec<Transaction> = (0..50)
            .map(|i| {
                let mut t = txn(&format!("t{i}"), 1, dec!(9.99), day);
                t.product = Some(product(Some("Toys"), dec!(9.99)));
                t
            })
            .collect();
        let uncategorized = vec![
            txn("no-product", 1, dec!(1000), day),
            {
                let mut t = txn("no-category", 1, dec!(1000), day);
                t.product = Some(product(None, dec!(1000)));
                t
            },
        ];
        let expected_sum: Decimal = books.iter().map(Transaction::total_value).sum();

        let mut orders = vec![order(None, day, books), order(None, day, toys)];
        orders.push(order(None, day, uncategorized));

        let averages = engine().average_transaction_value_per_category(&orders);
        assert_eq!(averages.len(), 1);
        let expected = expected_sum.to_f64().unwrap() / 51.0;
        assert!((averages["Books"] - expected).abs() < 1e-9);
        assert!(!averages.contains_key("Toys"));
    }

    #[test]
    fn breaches_need_three_failures_inside_a_day() {
        let orders = vec![
            // Two failures only.
            order(Some(customer("two")), at(6, 1, 0), vec![failed("t1", at(6, 1, 0)), failed("t2", at(6, 1, 1))]),
            // Three failures across two orders, all within 24h.
            order(Some(customer("burst")), at(6, 1, 0), vec![failed("b1", at(6, 1, 23)), failed("b2", at(6, 1, 2))]),
            order(Some(customer("burst")), at(6, 2, 0), vec![failed("b3", at(6, 2, 1))]),
            // Three failures spread over more than a day.
            order(
                Some(customer("spread")),
                at(6, 1, 0),
                vec![failed("s1", at(6, 1, 0)), failed("s2", at(6, 1, 12)), failed("s3", at(6, 2, 1))],
            ),
            // Successful transactions never count.
            order(
                Some(customer("happy")),
                at(6, 1, 0),
                vec![txn("h1", 1, dec!(1), at(6, 1, 0)), txn("h2", 1, dec!(1), at(6, 1, 0)), txn("h3", 1, dec!(1), at(6, 1, 0))],
            ),
            order(None, at(6, 1, 0), vec![failed("n1", at(6, 1, 0)), failed("n2", at(6, 1, 0)), failed("n3", at(6, 1, 0))]),
        ];

        let breached = engine().detect_sla_breaches(&orders);
        let ids: Vec<&str> = breached.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["burst"]);

        let windows = engine().sla_breach_windows(&orders);
        assert_eq!(windows[0].failed_transactions, 3);
        assert_eq!(windows[0].window.first_failure, at(6, 1, 2));
        assert_eq!(windows[0].window.last_failure, at(6, 2, 1));
    }

    #[test]
    fn breach_scan_tolerates_null_entries() {
        let mut o = order(
            Some(customer("c")),
            at(6, 1, 0),
            vec![failed("1", at(6, 1, 0)), failed("2", at(6, 1, 1)), failed("3", at(6, 1, 2))],
        );
        o.transactions.insert(1, None);
        assert_eq!(engine().detect_sla_breaches(&[o]).len(), 1);
    }

    #[test]
    fn highest_value_order_reports_sequence_edges() {
        let small = order(None, at(1, 1, 0), vec![txn("s", 1, dec!(1), at(1, 1, 0))]);
        let mut big = order(
            None,
            at(1, 2, 0),
            vec![
                txn("A", 1, dec!(10), at(1, 2, 23)),
                txn("B", 1, dec!(10), at(1, 2, 1)),
                txn("C", 1, dec!(10), at(1, 2, 5)),
            ],
        );
        big.transactions.push(None);
        let tie = order(None, at(1, 3, 0), vec![txn("T", 3, dec!(10), at(1, 3, 0))]);

        let result = engine().highest_value_order_edges(&[small, big.clone(), tie]);
        let edges = result.edges().unwrap();
        assert_eq!(edges.order_id, big.id);
        assert_eq!(edges.total_value, dec!(30));
        assert_eq!(edges.first_transaction.as_ref().unwrap().id, "A");
        assert_eq!(edges.last_transaction.as_ref().unwrap().id, "C");
    }

    #[test]
    fn highest_value_order_without_transactions_is_a_sentinel() {
        let orders = vec![order(Some(customer("a")), at(1, 1, 0), vec![]); 3];
        let result = engine().highest_value_order_edges(&orders);
        assert_eq!(result, HighestValueOrder::NoValidOrders);
        assert_eq!(result.to_string(), "No valid orders found");
        assert_eq!(engine().highest_value_order_edges(&[]), HighestValueOrder::NoValidOrders);
    }

    #[test]
    fn order_holding_only_null_entries_is_not_eligible() {
        let nulls_only = Order::new(None, Some(customer("a")), at(1, 1, 0), Some(vec![None, None]), "SUCCESS");
        let result = engine().highest_value_order_edges(std::slice::from_ref(&nulls_only));
        assert_eq!(result, HighestValueOrder::NoValidOrders);

        let real = order(None, at(1, 2, 0), vec![txn("only", 1, dec!(0), at(1, 2, 0))]);
        let result = engine().highest_value_order_edges(&[nulls_only, real.clone()]);
        assert_eq!(result.edges().map(|e| e.order_id), Some(real.id));
    }

    #[test]
    fn oversized_totals_saturate_instead_of_panicking() {
        let march = YearMonth::new(2024, 3).unwrap();
        let huge = order(
            Some(customer("whale")),
            at(3, 5, 9),
            vec![txn("h1", 2, Decimal::MAX, at(3, 5, 9)), txn("h2", 1, Decimal::MAX, at(3, 5, 10))],
        );
        let modest = order(Some(customer("minnow")), at(3, 6, 9), vec![txn("m", 3, dec!(10), at(3, 6, 9))]);
        let again = order(Some(customer("whale")), at(3, 7, 9), vec![txn("h3", 4, Decimal::MAX, at(3, 7, 9))]);
        let orders = vec![huge, modest, again];

        let top = engine().top_customers_by_spend(&orders, march);
        let ids: Vec<&str> = top.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["whale", "minnow"]);

        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let daily = engine().daily_sales(&orders, day, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(daily[&day], Decimal::MAX);
        assert_eq!(daily[&NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()], dec!(30));

        let stats = engine().transaction_value_statistics(&orders);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.sum, Decimal::MAX);
        assert_eq!(stats.max, Some(Decimal::MAX));

        assert!(matches!(
            engine().highest_value_order_edges(&orders),
            HighestValueOrder::Found(edges) if edges.total_value == Decimal::MAX
        ));
    }

    #[test]
    fn product_statistics_cover_prices() {
        let products = vec![
            product(Some("a"), dec!(10)),
            Product::new("free", "Sample", None, None, None),
            product(Some("b"), dec!(35.50)),
        ];
        let stats = engine().product_statistics(&products);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.sum, dec!(45.50));
        assert_eq!(stats.min, Some(Decimal::ZERO));
        assert_eq!(stats.max, Some(dec!(35.50)));
        assert_eq!(stats.average, Some(dec!(45.50) / dec!(3)));
        assert_eq!(eager_engine().product_statistics_parallel(&products), stats);
        assert_eq!(engine().product_statistics(&[]), Statistics::EMPTY);
    }

    #[test]
    fn transaction_value_statistics_skip_null_entries() {
        let mut o = order(None, at(1, 1, 0), vec![txn("a", 2, dec!(3), at(1, 1, 0))]);
        o.transactions.push(None);
        let stats = engine().transaction_value_statistics(&[o]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.sum, dec!(6));
    }

    #[test]
    fn risk_scores_keep_the_first_colliding_order() {
        let id = Uuid::from_u128(7);
        let first = Order::new(Some(id), None, at(1, 1, 0), Some(vec![None, None]), "SUCCESS");
        let second = Order::new(Some(id), None, at(1, 1, 0), None, "SUCCESS");
        let other = Order::new(Some(Uuid::from_u128(8)), None, at(1, 1, 0), None, "SUCCESS");

        let engine = eager_engine();
        let scores = engine.risk_scores(&[first.clone(), second.clone(), other.clone()]);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[&id], engine.risk_scores(&[first.clone()])[&id]);
        assert_ne!(scores[&id], engine.risk_scores(&[second.clone()])[&id]);

        let parallel = engine.risk_scores_parallel(&[first, second, other]);
        assert_eq!(parallel, scores);
    }

    #[test]
    fn daily_sales_fill_every_day() {
        let orders = vec![
            order(None, at(7, 1, 8), vec![txn("a", 2, dec!(5), at(7, 1, 8))]),
            order(None, at(7, 1, 22), vec![txn("b", 1, dec!(0.25), at(7, 1, 22))]),
            order(None, at(7, 3, 10), vec![txn("c", 1, dec!(7), at(7, 3, 10))]),
            order(None, at(7, 9, 10), vec![txn("outside", 1, dec!(99), at(7, 9, 10))]),
            order(Some(customer("empty")), at(7, 2, 10), vec![]),
        ];
        let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();

        let report = engine().daily_sales(&orders, start, end);
        let values: Vec<(NaiveDate, Decimal)> = report.into_iter().collect();
        assert_eq!(
            values,
            vec![
                (start, dec!(10.25)),
                (NaiveDate::from_ymd_opt(2024, 7, 2).unwrap(), Decimal::ZERO),
                (NaiveDate::from_ymd_opt(2024, 7, 3).unwrap(), dec!(7)),
                (end, Decimal::ZERO),
            ]
        );

        assert!(engine().daily_sales(&orders, end, start).is_empty());
        assert_eq!(engine().daily_sales(&orders, start, start).len(), 1);
    }

    #[test]
    fn price_range_takes_the_sorted_window() {
        let orders: Vec<Order> = [50, 10, 30, 0, 40, 20]
            .into_iter()
            .map(|v| order(None, at(1, 1, 0), vec![txn("t", 1, Decimal::from(v), at(1, 1, 0))]))
            .collect();

        let totals = |selected: Vec<&Order>| -> Vec<Decimal> {
            selected.iter().map(|o| o.total_value()).collect()
        };

        let within = engine().orders_in_price_range(&orders, dec!(15), dec!(40));
        assert_eq!(totals(within), vec![dec!(20), dec!(30), dec!(40)]);

        let all = engine().orders_in_price_range(&orders, Decimal::ZERO, Decimal::MAX);
        assert_eq!(all.len(), orders.len());
        assert_eq!(
            totals(all),
            vec![dec!(0), dec!(10), dec!(20), dec!(30), dec!(40), dec!(50)]
        );

        assert!(engine().orders_in_price_range(&orders, dec!(60), dec!(70)).is_empty());
    }

    #[test]
    fn emails_are_deduplicated_and_blank_free() {
        let customer = Customer::new(
            "c",
            "Casey",
            Some("casey@example.com".to_string()),
            None,
            Some(vec![
                Some("   ".to_string()),
                Some("work@example.com".to_string()),
                None,
                Some("casey@example.com".to_string()),
                Some("Work@example.com".to_string()),
                Some(String::new()),
            ]),
        );

        assert_eq!(
            engine().customer_emails(Some(&customer)),
            vec!["casey@example.com", "work@example.com", "Work@example.com"]
        );
        assert!(engine().customer_emails(None).is_empty());

        let no_primary = Customer::new("d", "Dana", None, None, Some(vec![Some("d@x.io".to_string())]));
        assert_eq!(engine().customer_emails(Some(&no_primary)), vec!["d@x.io"]);
    }

    #[test]
    fn data_quality_counts_malformed_records() {
        let mut with_null = order(Some(customer("a")), at(1, 1, 0), vec![txn("t", 1, dec!(1), at(1, 1, 0))]);
        with_null.transactions.push(None);
        let duplicate = with_null.clone();
        let orders = vec![
            with_null,
            duplicate,
            order(None, at(1, 1, 0), vec![]),
        ];

        let summary = engine().data_quality(&orders);
        assert_eq!(
            summary,
            DataQualitySummary {
                total_orders: 3,
                orders_without_customer: 1,
                orders_without_transactions: 1,
                null_transactions: 2,
                duplicate_order_ids: 1,
            }
        );
    }
}
