//! Static files copied into the project as-is

/// Web packages the generated components import
pub const WEB_PACKAGES: &[&str] = &[
    "humanize-string",
    "string-strip-html",
    "remirror",
    "@remirror/react",
    "@remirror/pm",
];

/// Display formatters used by list and detail views
pub const RADMIN_FORMATTERS: &str = r#"import React from 'react'

import humanize from 'humanize-string'
import { stripHtml } from 'string-strip-html'

const MAX_STRING_LENGTH = 45
const MAX_ID_LENGTH = 6

const MINUTE_IN_MS = 60 * 1000
const HOUR_IN_MS = 60 * MINUTE_IN_MS
const DAY_IN_MS = 24 * HOUR_IN_MS
const MONTH_IN_MS = 30 * DAY_IN_MS
const YEAR_IN_MS = 365 * DAY_IN_MS

export const formatEnum = (values: string | string[] | null | undefined) => {
  if (Array.isArray(values)) {
    return values.map((value) => humanize(value)).join(', ')
  }

  return values ? humanize(values) : ''
}

export const formatDatetime = (value: string | null | undefined) => {
  return value ? value.replace(/:\d{2}\.\d{3}\w/, '') : value
}

export const jsonDisplay = (obj: unknown) => {
  return (
    <pre>
      <code>{JSON.stringify(obj, null, 2)}</code>
    </pre>
  )
}

const looksLikeId = (text: string) => text.length > 20 && !/\s/.test(text)

export const truncate = (
  value: string | number | null | undefined,
  { isId = false, checkForId = false } = {}
) => {
  const text = stripHtml(value?.toString() ?? '').result
  const shortenAsId = isId || (checkForId && looksLikeId(text))
  const maxLength = shortenAsId ? MAX_ID_LENGTH : MAX_STRING_LENGTH

  if (text.length <= maxLength) {
    return <>{text}</>
  }

  const keep = shortenAsId ? maxLength - 1 : maxLength

  return <span title={text}>{text.substring(0, keep)}&hellip;</span>
}

export const truncateId = (value: string | number) => truncate(value, { isId: true })

export const truncateMaybeId = (value: string | number | null | undefined) =>
  truncate(value, { checkForId: true })

export const jsonTruncate = (obj: unknown) => truncate(JSON.stringify(obj, null, 2))

const relativeTime = (diff: number, unit: number, name: string) => {
  const count = Math.round(diff / unit)
  const amount = Math.abs(count) === 1 ? 'one ' + name : Math.abs(count) + ' ' + name + 's'

  return count >= 0 ? amount + ' ago' : 'in ' + amount
}

export const timeTag = (dateTime: string | null | undefined) => {
  if (!dateTime) {
    return ''
  }

  const date = new Date(dateTime)
  const diff = Date.now() - date.getTime()
  const absDiff = Math.abs(diff)

  let humanTime: string

  if (absDiff > 11 * MONTH_IN_MS) {
    humanTime = relativeTime(diff, YEAR_IN_MS, 'year')
  } else if (absDiff > 25 * DAY_IN_MS) {
    humanTime = relativeTime(diff, MONTH_IN_MS, 'month')
  } else if (absDiff > 20 * HOUR_IN_MS) {
    humanTime = relativeTime(diff, DAY_IN_MS, 'day')
  } else {
    humanTime =
      date.getHours().toString().padStart(2, '0') +
      ':' +
      date.getMinutes().toString().padStart(2, '0')
  }

  humanTime = humanTime.charAt(0).toUpperCase() + humanTime.slice(1)

  return (
    <time dateTime={dateTime} title={dateTime}>
      {humanTime}
    </time>
  )
}

export const checkboxInputTag = (checked: boolean | null | undefined) => {
  return <input type="checkbox" checked={!!checked} disabled />
}
"#;

/// Page links under list views
pub const PAGINATOR: &str = r#"import { Link } from '@redwoodjs/router'

interface Props {
  count: number
  page: number
  perPage: number
  route: (page: number) => string
}

const Paginator = ({ count, page, perPage, route }: Props) => {
  const pageCount = Math.max(1, Math.ceil(count / perPage))

  if (pageCount === 1) {
    return null
  }

  const pages = Array.from({ length: pageCount }, (_, index) => index + 1)

  return (
    <nav className="radmin-paginator" aria-label="Pagination">
      {page > 1 && <Link to={route(page - 1)}>Previous</Link>}
      <ul>
        {pages.map((pageNumber) => (
          <li key={pageNumber}>
            {pageNumber === page ? (
              <span aria-current="page">{pageNumber}</span>
            ) : (
              <Link to={route(pageNumber)}>{pageNumber}</Link>
            )}
          </li>
        ))}
      </ul>
      {page < pageCount && <Link to={route(page + 1)}>Next</Link>}
    </nav>
  )
}

export default Paginator
"#;

/// Rich-text editor for long-form string fields
pub const WYSIWYG_EDITOR: &str = r#"import 'remirror/styles/all.css'

import {
  EditorComponent,
  OnChangeHTML,
  Remirror,
  useActive,
  useChainedCommands,
  useCommands,
  useRemirror,
} from '@remirror/react'
import {
  BoldExtension,
  ItalicExtension,
  LinkExtension,
} from 'remirror/extensions'

const Menu = () => {
  const active = useActive()
  const { toggleBold, toggleItalic } = useCommands()
  const chain = useChainedCommands()

  return (
    <div className="radmin-editor-menu">
      <button
        type="button"
        disabled={!toggleBold.enabled()}
        className={active.bold() ? 'active' : undefined}
        onClick={() => chain.toggleBold().focus().run()}
      >
        B
      </button>
      <button
        type="button"
        disabled={!toggleItalic.enabled()}
        className={active.italic() ? 'active' : undefined}
        onClick={() => chain.toggleItalic().focus().run()}
      >
        I
      </button>
    </div>
  )
}

interface Props {
  defaultValue: string
  className?: string
  setValue: (value: string) => void
}

const WysiwygEditor = ({ defaultValue, className, setValue }: Props) => {
  const { manager, state } = useRemirror({
    extensions: () => [
      new LinkExtension({ autoLink: true }),
      new BoldExtension({}),
      new ItalicExtension(),
    ],
    content: defaultValue,
    selection: 'start',
    stringHandler: 'html',
  })

  return (
    <div className={'remirror-theme ' + (className ?? '')}>
      <Remirror manager={manager} initialContent={state}>
        <Menu />
        <EditorComponent />
        <OnChangeHTML onChange={setValue} />
      </Remirror>
    </div>
  )
}

export default WysiwygEditor
"#;

/// Admin panel stylesheet, imported before the app's own styles
pub const RADMIN_CSS: &str = r#".radmin {
  --radmin-accent: #2563eb;
  --radmin-danger: #dc2626;
  --radmin-border: #e5e7eb;
  --radmin-muted: #6b7280;
  min-height: 100vh;
  font-family: system-ui, -apple-system, 'Segoe UI', Roboto, sans-serif;
  color: #111827;
  background: #f9fafb;
}

.radmin a {
  color: var(--radmin-accent);
}

.radmin-header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 0.75rem 1.5rem;
  background: #111827;
}

.radmin-header h1 {
  margin: 0;
  font-size: 1.25rem;
}

.radmin-header h1 a {
  color: #fff;
  text-decoration: none;
}

.radmin-body {
  display: flex;
}

.radmin-nav {
  width: 14rem;
  padding: 1rem;
  border-right: 1px solid var(--radmin-border);
}

.radmin-nav ul,
.radmin-dashboard {
  margin: 0;
  padding: 0;
  list-style: none;
}

.radmin-nav li,
.radmin-dashboard li {
  padding: 0.25rem 0;
}

.radmin-main {
  flex: 1;
  padding: 1.5rem;
  overflow-x: auto;
}

.radmin-panel {
  padding: 1rem 1.5rem;
  background: #fff;
  border: 1px solid var(--radmin-border);
  border-radius: 0.5rem;
}

.radmin-list-header {
  display: flex;
  flex-wrap: wrap;
  align-items: center;
  gap: 1rem;
  margin-bottom: 1rem;
}

.radmin-list-header h2 {
  flex: 1;
  margin: 0;
}

.radmin-search {
  display: flex;
  gap: 0.5rem;
}

.radmin-table-wrapper {
  overflow-x: auto;
}

.radmin-table {
  width: 100%;
  border-collapse: collapse;
  font-size: 0.875rem;
}

.radmin-table th,
.radmin-table td {
  padding: 0.5rem 0.75rem;
  text-align: left;
  border-bottom: 1px solid var(--radmin-border);
}

.radmin-table th {
  color: var(--radmin-muted);
  font-weight: 600;
}

.radmin-detail th {
  width: 12rem;
}

.radmin-table-actions,
.radmin-button-group {
  display: flex;
  gap: 0.5rem;
  margin-top: 1rem;
}

.radmin-table-actions {
  justify-content: flex-end;
  margin-top: 0;
}

.radmin-button {
  display: inline-block;
  padding: 0.375rem 0.75rem;
  font-size: 0.875rem;
  color: #111827;
  text-decoration: none;
  cursor: pointer;
  background: #fff;
  border: 1px solid var(--radmin-border);
  border-radius: 0.375rem;
}

.radmin a.radmin-button-primary,
.radmin-button-primary {
  color: #fff;
  background: var(--radmin-accent);
  border-color: var(--radmin-accent);
}

.radmin-button-danger {
  color: var(--radmin-danger);
  border-color: var(--radmin-danger);
}

.radmin-button-small {
  padding: 0.125rem 0.5rem;
  font-size: 0.75rem;
}

.radmin-field-description {
  margin: 0.25rem 0;
  font-size: 0.75rem;
  color: var(--radmin-muted);
}

.radmin-paginator {
  display: flex;
  align-items: center;
  justify-content: center;
  gap: 1rem;
  margin-top: 1rem;
}

.radmin-paginator ul {
  display: flex;
  gap: 0.5rem;
  margin: 0;
  padding: 0;
  list-style: none;
}

.radmin-paginator [aria-current='page'] {
  font-weight: 700;
}

.radmin-auth {
  max-width: 24rem;
  margin: 3rem auto;
}

.radmin-auth-switch {
  margin-top: 1rem;
  font-size: 0.875rem;
}

.radmin-editor-menu {
  display: flex;
  gap: 0.25rem;
  margin-bottom: 0.25rem;
}

.radmin-editor-menu .active {
  font-weight: 700;
}

.radmin-loading {
  color: var(--radmin-muted);
}

.sr-only {
  position: absolute;
  width: 1px;
  height: 1px;
  padding: 0;
  margin: -1px;
  overflow: hidden;
  clip: rect(0, 0, 0, 0);
  white-space: nowrap;
  border: 0;
}
"#;
